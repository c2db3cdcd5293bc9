//! Image data and the things derived from it.

pub mod image;
pub mod processing;
pub mod time;
