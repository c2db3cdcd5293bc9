//! The primary `LeemImage` object, which parses
//! a `.dat` file into its header, metadata, and pixels.
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::NaiveDateTime;
use ndarray::prelude::*;
use tracing::{debug, info_span};

use crate::data::image::{load_pixels, Dimensions};
use crate::data::processing::{
    normalize_on_ccd, BackgroundFilter, LevelEstimator, LevelRegion,
};
use crate::file_data::FileHeader;
use crate::metadata::{decode_metadata, read_metadata_block, FieldOfView, Metadata};
use crate::utils::LeemError;

/// A fully decoded U-View image. Built once per file and
/// not modified afterwards; the processing methods return
/// new arrays.
#[derive(Debug, Clone)]
pub struct LeemImage {
    filename : Option<String>,
    header : FileHeader,
    metadata : Metadata,
    pixels : Array2<u16>,
    field_of_view : FieldOfView,
    is_leed : bool,
}

impl LeemImage {

    /// Opens and decodes a file. The file is closed again
    /// before this returns, whether or not decoding succeeded.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the `.dat` file to open
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// let image = LeemImage::open("Au111_LEEM.dat")?;
    /// println!("{} x {}", image.width(), image.height());
    /// ```
    pub fn open<P : AsRef<Path>>(path : P) -> Result<Self, LeemError> {
        let path = path.as_ref();
        let _span = info_span!("leem_file", path = %path.display()).entered();

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut image = Self::from_reader(&mut reader)?;
        image.filename = Some(path.display().to_string());
        Ok(image)
    }

    /// Decodes an image from any seekable byte source. The
    /// source is rewound first; the pixel payload is located
    /// from its end.
    pub fn from_reader<R : Read + Seek>(reader : &mut R) -> Result<Self, LeemError> {
        reader.rewind()?;
        let header = FileHeader::from_reader(reader)?;
        let dimensions = Dimensions::from_header(&header)?;
        debug!(
            id = %header.id,
            width = dimensions.xdim,
            height = dimensions.ydim,
            timestamp = ?header.timestamp,
            "Header"
        );

        let block = read_metadata_block(reader, &header)?;
        let data_start = reader.stream_position()?;
        let decoded = decode_metadata(&block);

        let pixels = load_pixels(reader, &dimensions, data_start)?;

        Ok(LeemImage {
            filename : None,
            header,
            metadata : decoded.metadata,
            pixels,
            field_of_view : decoded.field_of_view,
            is_leed : decoded.is_leed,
        })
    }

    /// Path the image was opened from, if any
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// `height x width` samples, row 0 at the top
    pub fn pixels(&self) -> &Array2<u16> {
        &self.pixels
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    pub fn field_of_view(&self) -> &FieldOfView {
        &self.field_of_view
    }

    /// True for diffraction (LEED) images
    pub fn is_leed(&self) -> bool {
        self.is_leed
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.header.timestamp
    }

    /// Divides this image by a CCD reference image and scales
    /// the result to a maximum of 1.0.
    ///
    /// ## Errors
    ///
    /// * `LeemError::DimensionsError` - if the images differ in size
    pub fn normalize_on_ccd(&self, ccd : &LeemImage) -> Result<Array2<f64>, LeemError> {
        Ok(normalize_on_ccd(&self.pixels.view(), &ccd.pixels.view())?)
    }

    /// High-pass residual of this image, see `BackgroundFilter`
    pub fn filter_inelastic_background(&self, filter : &BackgroundFilter) -> Array2<f64> {
        filter.apply(&self.pixels.view())
    }

    /// Diffraction images use the full frame for levels, real-space
    /// images only the square inside the channelplate.
    pub fn level_region(&self) -> LevelRegion {
        if self.is_leed { LevelRegion::Full } else { LevelRegion::InnerSquare }
    }

    /// `(min_level, max_level)` for displaying this image
    pub fn levels(&self) -> Option<(f64, f64)> {
        self.levels_with(&LevelEstimator::default())
    }

    pub fn levels_with(&self, estimator : &LevelEstimator) -> Option<(f64, f64)> {
        estimator.estimate(&self.pixels.view(), self.level_region())
    }

    /// Levels of data derived from this image (e.g. CCD-normalized),
    /// cropped the way this image would be.
    pub fn levels_of<A>(&self, data : &ArrayView2<A>) -> Option<(f64, f64)>
    where A : Copy + Into<f64> {
        LevelEstimator::default().estimate(data, self.level_region())
    }
}
