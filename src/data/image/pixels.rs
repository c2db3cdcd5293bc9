use std::io::{Read, Seek, SeekFrom};

use bytemuck::cast_slice_mut;
use ndarray::prelude::*;
use tracing::{debug, warn};

use crate::data::image::Dimensions;
use crate::utils::LeemError;

/// Reads the pixel payload, which always occupies the last
/// `2 * width * height` bytes of the file, as little-endian `u16`
/// samples. The rows are stored bottom-up, so the returned array is
/// flipped vertically: row 0 is the top of the image.
///
/// `data_start` is where the header and metadata end. A payload
/// reaching back before it is still read, but logged.
///
/// ## Arguments
///
/// * `reader` - Any reader of a `.dat` file
///
/// * `dimensions` - The frame size from the header
///
/// * `data_start` - Offset of the first byte after the metadata block
///
/// ## Errors
///
/// * `LeemError::TruncatedPixels` - if the file is shorter than the payload
///
/// ## Example
///
/// ```rust, ignore
/// let mut f = File::open("image.dat")?;
/// let frame = load_pixels(&mut f, &Dimensions::new(1024, 1024), 388)?;
/// assert_eq!(frame.dim(), (1024, 1024));
/// ```
pub fn load_pixels<R : Read + Seek>(
    reader : &mut R,
    dimensions : &Dimensions,
    data_start : u64,
) -> Result<Array2<u16>, LeemError> {
    let expected = dimensions.pixel_bytes();
    let file_len = reader.seek(SeekFrom::End(0))?;

    if file_len < expected {
        return Err(LeemError::TruncatedPixels { expected, available : file_len });
    }
    let payload_start = file_len - expected;
    if payload_start < data_start {
        warn!(
            payload_start,
            data_start,
            "Pixel payload overlaps the header and metadata"
        );
    }
    debug!(payload_start, bytes = expected, "Reading pixel payload");

    reader.seek(SeekFrom::Start(payload_start))?;
    let mut samples = vec![0u16; dimensions.xdim * dimensions.ydim];
    reader.read_exact(cast_slice_mut::<u16, u8>(&mut samples))?;
    samples.iter_mut().for_each(|px| *px = u16::from_le(*px));

    let stored = Array2::<u16>::from_shape_vec(dimensions.to_tuple(), samples)
        .map_err(|err| LeemError::FormatError(err.to_string()))?;

    Ok(stored.slice(s![..;-1, ..]).as_standard_layout().into_owned())
}
