//! This module contains the file layout information -- purely
//! for I/O operations, does not know about metadata semantics
//! or image processing.

pub mod header;
pub mod strings;

pub use header::FileHeader;
