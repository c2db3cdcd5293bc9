//! Code in this submodule deals strictly with attention to
//! image dimensions and the types of things that can go wrong
//! with `Dimensions`.
//!

use crate::file_data::FileHeader;

/// `Dimensions` is a simple struct that holds the dimensions
/// of a frame
///
/// `xdim` is the width of the frame
/// `ydim` is the height of the frame
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Dimensions {
    pub xdim : usize,
    pub ydim : usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimensionsError {
    #[error("Mismatched dimensions. Requested: ({}, {}), Required: ({}, {})",
        requested.xdim, requested.ydim, required.xdim, required.ydim)]
    MismatchedDimensions{required : Dimensions, requested: Dimensions},
    #[error("Image has a zero-sized dimension ({xdim} x {ydim})")]
    ZeroSized{xdim : usize, ydim : usize},
}

impl Dimensions {
    pub fn new(xdim : usize, ydim : usize) -> Dimensions {
        Dimensions {
            xdim,
            ydim,
        }
    }

    /// Reads the frame size declared in the fixed header.
    /// Both axes must be nonzero.
    pub fn from_header(header : &FileHeader) -> Result<Dimensions, DimensionsError> {
        let (xdim, ydim) = (header.width as usize, header.height as usize);
        if xdim == 0 || ydim == 0 {
            return Err(DimensionsError::ZeroSized { xdim, ydim });
        }
        Ok(Dimensions::new(xdim, ydim))
    }

    /// Returns the dimensions as a tuple (y, x)
    pub fn to_tuple(&self) -> (usize, usize) {
        (self.ydim, self.xdim)
    }

    /// Number of bytes occupied by a frame of `u16` samples
    pub fn pixel_bytes(&self) -> u64 {
        (self.xdim as u64) * (self.ydim as u64) * std::mem::size_of::<u16>() as u64
    }

    /// Errors unless `other` has exactly these dimensions.
    pub fn require(&self, other : &Dimensions) -> Result<(), DimensionsError> {
        if self != other {
            return Err(DimensionsError::MismatchedDimensions {
                required : *self,
                requested : *other,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_bytes_are_two_per_sample() {
        assert_eq!(Dimensions::new(2, 3).pixel_bytes(), 12);
        assert_eq!(Dimensions::new(1024, 1024).pixel_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn require_reports_both_shapes() {
        let required = Dimensions::new(4, 4);
        let requested = Dimensions::new(4, 2);
        assert!(required.require(&Dimensions::new(4, 4)).is_ok());
        let err = required.require(&requested).unwrap_err();
        assert_eq!(err, DimensionsError::MismatchedDimensions { required, requested });
        assert_eq!(
            err.to_string(),
            "Mismatched dimensions. Requested: (4, 2), Required: (4, 4)"
        );
    }
}
