//! Numeric helpers layered on top of a decoded frame. Each one
//! derives a new array and leaves the pixels alone.

mod background;
mod ccd;
mod levels;

pub use background::BackgroundFilter;
pub use ccd::normalize_on_ccd;
pub use levels::{inner_square, Histogram, LevelEstimator, LevelRegion};
