//! Reader for Elmitec U-View `.dat` files, the image format of
//! LEEM/PEEM microscopes: a fixed header, a tagged metadata
//! block, and a 16-bit pixel payload at the end of the file.
//!
//! Writing files, overlay data, and multi-frame (`.dav`)
//! containers are not supported.

use std::path::Path;

use rayon::prelude::*;

mod data;
mod file_data;
mod leemimage;
mod metadata;
mod utils;

#[cfg(test)]
mod tests;

pub use data::image::{load_pixels, Dimensions, DimensionsError};
pub use data::processing::{
    inner_square, normalize_on_ccd, BackgroundFilter, Histogram, LevelEstimator, LevelRegion,
};
pub use data::time::{filetime_to_datetime, windows_epoch, TICKS_PER_SECOND};
pub use file_data::FileHeader;
pub use leemimage::LeemImage;
pub use metadata::{
    decode_metadata, parser_for, read_metadata_block, Averaging, DecodedMetadata, FieldOfView,
    McpPlate, Metadata, MetadataRecord, MetadataValue, RecordError, RecordIterator, RecordParser,
    Unit, END_TAG, FOV_TAG, GAUGE_TAGS, STANDARD_TAGS,
};
pub use utils::LeemError;

/// `open_leem(path)` opens a U-View `.dat` file,
/// reads the data, and returns a `LeemImage` object.
///
/// ## Arguments
///
/// * `path` - Path of the file to open
///
/// ## Example
///
/// ```rust, ignore
/// let image = leemdat::open_leem("Au111_LEEM.dat")?;
/// let (lo, hi) = image.levels().unwrap();
/// ```
pub fn open_leem<P : AsRef<Path>>(path : P) -> Result<LeemImage, LeemError> {
    LeemImage::open(path)
}

/// `open_many(paths)` decodes several files in parallel, one
/// independent decode per file. Results are in the order of `paths`.
///
/// ## Example
///
/// ```rust, ignore
/// let images = leemdat::open_many(&["image.dat", "ccd.dat"]);
/// ```
pub fn open_many<P : AsRef<Path> + Sync>(paths : &[P]) -> Vec<Result<LeemImage, LeemError>> {
    paths.par_iter().map(open_leem).collect()
}
