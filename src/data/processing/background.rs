//! High-pass filter for removing the diffuse inelastic background
//! of diffraction images: the image is normalized to its maximum
//! and a Gaussian-smoothed copy is subtracted from it.

use ndarray::prelude::*;
use rayon::prelude::*;

/// Settings for the Gaussian background filter.
///
/// `sigma` is the standard deviation in pixels. The kernel extends
/// `floor(truncate * sigma + 0.5)` pixels to each side. Edges are
/// extended by reflection about the edge (`d c b a | a b c d`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundFilter {
    pub sigma : f64,
    pub truncate : f64,
}

impl Default for BackgroundFilter {
    fn default() -> Self {
        BackgroundFilter { sigma : 15.0, truncate : 4.0 }
    }
}

impl BackgroundFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sigma(mut self, sigma : f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn truncate(mut self, truncate : f64) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn radius(&self) -> usize {
        if self.sigma > 0.0 && self.sigma.is_finite() {
            (self.truncate * self.sigma + 0.5).floor().max(0.0) as usize
        } else {
            0
        }
    }

    /// Normalized 1D Gaussian of length `2 * radius + 1`
    pub fn kernel(&self) -> Vec<f64> {
        let radius = self.radius();
        if radius == 0 {
            return vec![1.0];
        }
        let sigma2 = self.sigma * self.sigma;
        let mut kernel : Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-(x * x) / (2.0 * sigma2)).exp()
            })
            .collect();
        let sum : f64 = kernel.iter().sum();
        kernel.iter_mut().for_each(|k| *k /= sum);
        kernel
    }

    /// Separable Gaussian smoothing along both axes
    pub fn smooth(&self, data : &ArrayView2<f64>) -> Array2<f64> {
        let kernel = self.kernel();
        let rows_smoothed = convolve_rows(data, &kernel);
        let both = convolve_rows(&rows_smoothed.t(), &kernel);
        both.t().as_standard_layout().into_owned()
    }

    /// Returns `normalized - smooth(normalized)` where `normalized`
    /// is `pixels / max(pixels)`. An all-zero image gives all zeros.
    pub fn apply(&self, pixels : &ArrayView2<u16>) -> Array2<f64> {
        let max = pixels.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return Array2::zeros(pixels.raw_dim());
        }
        let normalized = pixels.mapv(|px| px as f64 / max as f64);
        let smoothed = self.smooth(&normalized.view());
        normalized - smoothed
    }
}

/// Maps an out-of-range index back into `0..len` by reflection,
/// repeating the edge sample.
fn reflect_index(i : isize, len : usize) -> usize {
    let period = 2 * len as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len { r } else { 2 * len - 1 - r }
}

fn convolve_lane(input : &ArrayView1<f64>, kernel : &[f64], out : &mut ArrayViewMut1<f64>) {
    let radius = (kernel.len() / 2) as isize;
    let len = input.len();
    for (i, out_i) in out.iter_mut().enumerate() {
        *out_i = kernel.iter().enumerate()
            .map(|(k, &kv)| kv * input[reflect_index(i as isize + k as isize - radius, len)])
            .sum();
    }
}

/// Convolves every row of `input` with `kernel`, one row per task
fn convolve_rows(input : &ArrayView2<f64>, kernel : &[f64]) -> Array2<f64> {
    let mut output = Array2::<f64>::zeros(input.raw_dim());
    let rows : Vec<_> = output.axis_iter_mut(Axis(0))
        .zip(input.axis_iter(Axis(0)))
        .collect();

    rows.into_par_iter().for_each(|(mut out_row, in_row)| {
        convolve_lane(&in_row, kernel, &mut out_row)
    });
    output
}
