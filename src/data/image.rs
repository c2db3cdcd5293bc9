//! `Image`
//!
//! Contains the data needed for parsing the pixel payload
//! into image-relevant structures.

mod dimensions;
mod pixels;

pub use dimensions::{Dimensions, DimensionsError};
pub use pixels::load_pixels;
