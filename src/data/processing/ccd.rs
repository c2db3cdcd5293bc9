use ndarray::prelude::*;
use ndarray::Zip;
use tracing::warn;

use crate::data::image::{Dimensions, DimensionsError};

/// Divides `image` by the CCD reference `ccd` element-wise, then
/// scales the quotient so its largest finite value is 1.0.
///
/// Pixels where the reference is 0 come out infinite (or NaN for
/// 0/0) and are ignored when finding the maximum. If there is no
/// positive finite maximum, the quotient is returned unscaled.
///
/// ## Errors
///
/// * `DimensionsError::MismatchedDimensions` - if the two grids
/// differ in shape. Neither input is touched.
pub fn normalize_on_ccd(
    image : &ArrayView2<u16>,
    ccd : &ArrayView2<u16>,
) -> Result<Array2<f64>, DimensionsError> {
    let required = Dimensions::new(image.ncols(), image.nrows());
    required.require(&Dimensions::new(ccd.ncols(), ccd.nrows()))?;

    let mut quotient = Array2::<f64>::zeros(image.raw_dim());
    Zip::from(&mut quotient).and(image).and(ccd)
        .for_each(|q, &num, &den| *q = num as f64 / den as f64);

    let max = quotient.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if max > 0.0 {
        quotient.mapv_inplace(|x| x / max);
    } else {
        warn!(max, "CCD-normalized image has no positive maximum, leaving unscaled");
    }
    Ok(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divides_and_rescales() {
        let image = array![[2u16, 4], [6, 8]];
        let ccd = array![[1u16, 1], [2, 1]];
        let normalized = normalize_on_ccd(&image.view(), &ccd.view()).unwrap();
        assert_eq!(normalized, array![[0.25, 0.5], [0.375, 1.0]]);
        assert_eq!(normalized.iter().cloned().fold(f64::MIN, f64::max), 1.0);
    }

    #[test]
    fn mismatched_dimensions_are_reported() {
        let image = array![[2u16, 4], [6, 8]];
        let ccd = array![[1u16, 1, 1]];
        let err = normalize_on_ccd(&image.view(), &ccd.view()).unwrap_err();
        assert_eq!(
            err,
            DimensionsError::MismatchedDimensions {
                required : Dimensions::new(2, 2),
                requested : Dimensions::new(3, 1),
            }
        );
        assert_eq!(image, array![[2u16, 4], [6, 8]]);
    }

    #[test]
    fn zero_reference_pixels_do_not_set_the_scale() {
        let image = array![[1u16, 4]];
        let ccd = array![[0u16, 2]];
        let normalized = normalize_on_ccd(&image.view(), &ccd.view()).unwrap();
        assert!(normalized[[0, 0]].is_infinite());
        assert_eq!(normalized[[0, 1]], 1.0);
    }
}
