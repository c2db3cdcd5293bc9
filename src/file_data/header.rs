//! The fixed-layout prefix of a U-View `.dat` file.
//!
//! Everything here sits at a known byte offset: a 104 byte
//! file header, an optional 128 byte recipe block, and the
//! first 28 bytes of the image header. The last field read
//! (`metadata_block_version`) says how to find the tagged
//! metadata block that follows.

use binrw::{
    io::{Read, Seek},
    BinRead,
};
use chrono::NaiveDateTime;

use crate::data::time::filetime_to_datetime;
use crate::file_data::strings::{decode_cp1252, null_terminated};

/// Size of the block reserved for an attached recipe
pub const RECIPE_BLOCK_SIZE : i16 = 128;

/// Bytes skipped after the image header when the metadata
/// block is not the standard 256 byte block.
pub const CUSTOM_METADATA_SKIP : i64 = 388;

/// Length of the standard metadata block (`metadata_block_version == 2`)
pub const STANDARD_METADATA_LEN : usize = 256;

/// Padding that carries the reader from the end of the
/// recipe to the end of the 128 byte recipe block.
fn recipe_padding(attached_recipe_size : i16) -> i64 {
    if attached_recipe_size > 0 {
        (RECIPE_BLOCK_SIZE - attached_recipe_size) as i64
    } else {
        0
    }
}

/// All of the scalar fields of the fixed header, in file order.
/// 16-bit fields are little-endian.
#[derive(BinRead, Debug, Clone, PartialEq)]
#[br(little)]
pub struct FileHeader {
    /// File identifier, trimmed at the first null byte
    #[br(map = |raw : [u8; 20]| decode_cp1252(null_terminated(&raw)))]
    pub id : String,
    pub size : i16,
    pub version : i16,
    pub bits_per_pixel : i16,

    // 6 bytes alignment, 8 bytes spare
    #[br(pad_before = 14)]
    pub width : u16,
    pub height : u16,
    pub number_of_images : i16,

    #[br(assert(
        (0..=RECIPE_BLOCK_SIZE).contains(&attached_recipe_size),
        "attached recipe size {} does not fit the recipe block",
        attached_recipe_size
    ))]
    pub attached_recipe_size : i16,

    #[br(
        pad_before = 56,
        count = attached_recipe_size as usize,
        pad_after = recipe_padding(attached_recipe_size)
    )]
    recipe : Vec<u8>,

    pub image_size : i16,
    pub image_version : i16,
    pub colorscale_low : i16,
    pub colorscale_high : i16,

    /// Raw `FILETIME` ticks
    pub timestamp_ticks : u64,
    #[br(calc = filetime_to_datetime(timestamp_ticks))]
    pub timestamp : Option<NaiveDateTime>,

    pub mask_xshift : i16,
    pub mask_yshift : i16,
    pub use_mask : u8,

    #[br(pad_before = 1)]
    pub attached_markup_size : i16,
    pub spin : i16,

    /// `2` for the standard 256 byte metadata block, otherwise
    /// the length of a custom block placed 388 bytes further on.
    pub metadata_block_version : u16,
}

impl FileHeader {
    /// Reads the header from a reader pointing
    /// to the start of the file.
    ///
    /// ## Errors
    ///
    /// * `binrw::Error` - if the source ends early (the error context
    /// names the field being read) or the recipe size is invalid.
    pub fn from_reader<R : Read + Seek>(reader : &mut R) -> binrw::BinResult<Self> {
        Self::read(reader)
    }

    /// The opaque recipe blob, if one is attached
    pub fn recipe(&self) -> Option<&[u8]> {
        if self.recipe.is_empty() { None } else { Some(&self.recipe) }
    }

    /// True when the tagged metadata is the standard 256 byte block
    pub fn has_standard_metadata_block(&self) -> bool {
        self.metadata_block_version == 2
    }
}
