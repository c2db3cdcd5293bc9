//! Contrast levels from an intensity histogram, ignoring a
//! handful of hot pixels at the top of the range.

use itertools::{Itertools, MinMaxResult};
use ndarray::prelude::*;
use tracing::debug;

/// Fixed-width histogram spanning the data's `[min, max]`.
/// `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub counts : Vec<usize>,
    pub edges : Vec<f64>,
}

impl Histogram {
    /// `None` for empty data or data without a spread (all equal).
    /// Values equal to the maximum land in the last bin.
    pub fn from_values<I>(values : I, bins : usize) -> Option<Histogram>
    where I : Iterator<Item = f64> + Clone {
        let (lo, hi) = match values.clone().minmax() {
            MinMaxResult::MinMax(lo, hi) if hi > lo => (lo, hi),
            _ => return None,
        };
        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        values.for_each(|v| {
            let bin = (((v - lo) / (hi - lo)) * bins as f64) as usize;
            counts[bin.min(bins - 1)] += 1;
        });
        Some(Histogram { counts, edges })
    }
}

/// Which part of the image to consider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRegion {
    /// The whole frame (diffraction images, where the background
    /// is as dark as the unilluminated corners)
    Full,
    /// The square inscribed in the round channelplate
    InnerSquare,
}

/// Finds `(min_level, max_level)` for contrast scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelEstimator {
    pub bins : usize,
    /// The top bin is treated as hot pixels if it holds fewer than
    /// this many pixels and the bin below it fewer than half as many.
    pub hot_pixel_count : usize,
}

impl Default for LevelEstimator {
    fn default() -> Self {
        LevelEstimator { bins : 30, hot_pixel_count : 10 }
    }
}

/// Half the side of the square inscribed in a circle of diameter
/// `length`, less a 5 pixel margin.
fn inner_half_size(length : usize) -> isize {
    (length as f64 / (2.0 * std::f64::consts::SQRT_2)) as isize - 5
}

/// The centered square inscribed in the sensor's active circle,
/// or the whole frame if that square would be empty.
pub fn inner_square<'a, A>(data : &'a ArrayView2<'_, A>) -> ArrayView2<'a, A> {
    let (nrows, ncols) = data.dim();
    let (half_rows, half_cols) = (inner_half_size(nrows), inner_half_size(ncols));
    if half_rows <= 0 || half_cols <= 0 {
        debug!(nrows, ncols, "Image too small for the inner square, using the full frame");
        return data.view();
    }
    let (row_mid, col_mid) = ((nrows / 2) as isize, (ncols / 2) as isize);
    data.slice(s![
        row_mid - half_rows..row_mid + half_rows,
        col_mid - half_cols..col_mid + half_cols
    ])
}

impl LevelEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bins(mut self, bins : usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn hot_pixel_count(mut self, count : usize) -> Self {
        self.hot_pixel_count = count;
        self
    }

    /// Returns `(min_level, max_level)`.
    ///
    /// `min_level` is the lowest value. `max_level` is normally the
    /// lower edge of the top bin. When the top bins are nearly empty
    /// (hot pixels), it is instead the lower edge of the highest
    /// populated bin below the top one.
    ///
    /// Non-finite values are ignored. A uniform image returns
    /// `(v, v)`; an empty one `None`.
    pub fn estimate<A>(&self, data : &ArrayView2<A>, region : LevelRegion) -> Option<(f64, f64)>
    where A : Copy + Into<f64> {
        let data = match region {
            LevelRegion::Full => data.view(),
            LevelRegion::InnerSquare => inner_square(data),
        };
        let values = data.iter()
            .map(|&v| Into::<f64>::into(v))
            .filter(|v| v.is_finite());

        let bins = self.bins.max(2);
        let histogram = match Histogram::from_values(values.clone(), bins) {
            Some(histogram) => histogram,
            None => {
                let first = values.clone().next()?;
                return Some((first, first));
            }
        };

        let (counts, edges) = (&histogram.counts, &histogram.edges);
        let min_level = edges[0];
        let top = counts[bins - 1];
        let second = counts[bins - 2];

        let max_level = if top < self.hot_pixel_count && second < self.hot_pixel_count / 2 {
            debug!(hot_pixels = top, "Hot pixels detected");
            match (0..bins - 1).rev().find(|&bin| counts[bin] > 0) {
                Some(bin) => edges[bin],
                None => edges[bins - 1],
            }
        } else {
            edges[bins - 1]
        };
        Some((min_level, max_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_matches_fixed_width_bins() {
        let values = vec![0.0, 1.0, 2.0, 3.0, 9.0, 10.0];
        let histogram = Histogram::from_values(values.into_iter(), 5).unwrap();
        assert_eq!(histogram.edges, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(histogram.counts, vec![2, 2, 0, 0, 2]);
        assert!(Histogram::from_values(vec![4.0; 3].into_iter(), 5).is_none());
    }

    #[test]
    fn uniform_image_is_degenerate() {
        let data = Array2::<u16>::from_elem((40, 40), 512);
        let levels = LevelEstimator::default().estimate(&data.view(), LevelRegion::Full);
        assert_eq!(levels, Some((512.0, 512.0)));
        let empty = Array2::<u16>::zeros((0, 4));
        assert_eq!(LevelEstimator::default().estimate(&empty.view(), LevelRegion::Full), None);
    }

    /// 0..=299 spread evenly, plus `hot` pixels at 3000
    fn with_hot_pixels(hot : usize) -> Array2<u16> {
        let mut data = Array2::<u16>::from_shape_fn((30, 30), |(r, c)| ((r * 30 + c) % 300) as u16);
        data.iter_mut().take(hot).for_each(|px| *px = 3000);
        data
    }

    #[test]
    fn hot_pixels_are_skipped() {
        // Bins are 100 wide; everything but the hot pixels sits in bins 0..=2
        let data = with_hot_pixels(9);
        let (lo, hi) = LevelEstimator::default()
            .estimate(&data.view(), LevelRegion::Full)
            .unwrap();
        assert_eq!(lo, 0.0);
        let edges = Histogram::from_values(data.iter().map(|&v| v as f64), 30).unwrap().edges;
        assert_eq!(hi, edges[2]);
        assert_eq!(hi, 200.0);
    }

    #[test]
    fn ten_bright_pixels_are_not_hot() {
        // The top bin must hold fewer than `hot_pixel_count`, so 9 is
        // the most hot pixels that get suppressed.
        let data = with_hot_pixels(10);
        let (_, hi) = LevelEstimator::default()
            .estimate(&data.view(), LevelRegion::Full)
            .unwrap();
        let edges = Histogram::from_values(data.iter().map(|&v| v as f64), 30).unwrap().edges;
        assert_eq!(hi, edges[29]);
    }

    #[test]
    fn inner_square_crops_dark_rim() {
        // A bright 100x100 disc-like center on a dark rim
        let data = Array2::<u16>::from_shape_fn((100, 100), |(r, c)| {
            if (20..80).contains(&r) && (20..80).contains(&c) { 1000 + (r + c) as u16 } else { 0 }
        });
        assert_eq!(inner_square(&data.view()).dim(), (60, 60));

        let (lo, _) = LevelEstimator::default()
            .estimate(&data.view(), LevelRegion::InnerSquare)
            .unwrap();
        assert!(lo >= 1000.0);
        let (lo_full, _) = LevelEstimator::default()
            .estimate(&data.view(), LevelRegion::Full)
            .unwrap();
        assert_eq!(lo_full, 0.0);
    }

    #[test]
    fn small_images_use_the_full_frame() {
        let data = Array2::<u16>::zeros((10, 10));
        assert_eq!(inner_square(&data.view()).dim(), (10, 10));
    }
}
