//! Record shapes of the tagged metadata block, and a parser for
//! each. Every parser takes the bytes following the tag byte and
//! returns the record along with its `offset`: the number of bytes
//! after the tag that the record occupies. The decoder then moves
//! `offset + 1` bytes forward, whether or not it understood the record.

use binrw::{io::Cursor, BinReaderExt};

use crate::file_data::strings::{decode_cp1252, null_terminated};
use crate::metadata::units::Unit;
use crate::metadata::values::Averaging;

/// Terminates the metadata block
pub const END_TAG : u8 = 255;

/// Tag of the field of view record
pub const FOV_TAG : u8 = 110;

/// Tags of the `name + unit digit, \0, f32` instrument fields.
/// The first group is written by the Bremen instruments, the
/// second by MAX-lab, and 55 (Wehnelt) by ALBA.
pub const STANDARD_TAGS : [u8; 92] = [
    11, 38, 39, 44, 158, 159, 160, 161, 162, 163, 164, 165, 149, 175,
    184, 169, 128, 129, 130, 131, 132, 133, 134, 135, 136, 137, 138,
    140, 141, 142, 143, 144, 145, 146, 147, 148, 150, 151, 152, 153,
    154, 155, 168, 170, 171, 173, 174,
    210, 203, 185, 208, 215, 206, 172, 211, 221, 220, 197, 177,
    178, 180, 181, 202, 190, 191, 194, 195, 196, 214, 198, 199,
    182, 179, 200, 201, 176, 187, 94, 192, 213, 209, 183, 186,
    212, 156, 157, 205, 204, 188, 189, 207,
    55,
];

/// Vacuum gauge tags (`name, \0, unit, \0, f32`)
pub const GAUGE_TAGS : [u8; 7] = [106, 107, 108, 109, 235, 236, 237];

/// Which microchannel plate voltage an `Mcp` record holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpPlate {
    Screen,
    ChannelPlate,
}

/// One decoded record of the metadata block.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataRecord {
    Standard { name : String, value : f32, unit : Unit },
    FieldOfView { text : String, calibration : f32 },
    CameraExposure { seconds : f32, averaging : u8 },
    Gauge { name : String, unit : String, value : f32 },
    StagePosition { x : f32, y : f32 },
    ImageTitle(String),
    MirrorState { index : u8, state : u8 },
    Mcp { plate : McpPlate, volts : f32 },
    /// A tag with no known shape. It is assumed to have no payload.
    Unknown(u8),
}

impl MetadataRecord {
    pub fn averaging(&self) -> Option<Averaging> {
        match self {
            MetadataRecord::CameraExposure { averaging, .. } => Some(Averaging::from_byte(*averaging)),
            _ => None,
        }
    }
}

/// Problems with a single record. `Truncated` means the block ended
/// inside the record; the others still know the record's `offset`
/// so decoding can continue past it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record with tag {tag} needs {needed} bytes, only {available} remain")]
    Truncated { tag : u8, needed : usize, available : usize },

    #[error("invalid unit code byte {byte:#04x}")]
    InvalidUnit { byte : u8, offset : usize },

    #[error("standard field has no name")]
    EmptyName { offset : usize },
}

impl RecordError {
    /// Where the next record starts (relative to the tag), if known
    pub fn offset(&self) -> Option<usize> {
        match self {
            RecordError::Truncated { .. } => None,
            RecordError::InvalidUnit { offset, .. } => Some(*offset),
            RecordError::EmptyName { offset } => Some(*offset),
        }
    }
}

pub type RecordResult = Result<(MetadataRecord, usize), RecordError>;

/// Parses the payload following a tag byte
pub type RecordParser = fn(u8, &[u8]) -> RecordResult;

fn read_f32(tag : u8, payload : &[u8], at : usize) -> Result<f32, RecordError> {
    let mut cursor = Cursor::new(payload);
    cursor.set_position(at as u64);
    cursor.read_le::<f32>().map_err(|_| RecordError::Truncated {
        tag,
        needed : at + 4,
        available : payload.len(),
    })
}

fn read_u8(tag : u8, payload : &[u8], at : usize) -> Result<u8, RecordError> {
    payload.get(at).copied().ok_or(RecordError::Truncated {
        tag,
        needed : at + 1,
        available : payload.len(),
    })
}

/// `name + unit digit, \0, f32`
pub fn parse_standard_field(tag : u8, payload : &[u8]) -> RecordResult {
    let raw = null_terminated(payload);
    let offset = raw.len() + 5;
    let value = read_f32(tag, payload, raw.len() + 1)?;

    let (&unit_digit, name) = raw.split_last()
        .ok_or(RecordError::EmptyName { offset })?;
    let unit = Unit::from_ascii_digit(unit_digit)
        .ok_or(RecordError::InvalidUnit { byte : unit_digit, offset })?;

    Ok((
        MetadataRecord::Standard { name : decode_cp1252(name), value, unit },
        offset,
    ))
}

/// `text, \0, f32 calibration factor`
pub fn parse_field_of_view(tag : u8, payload : &[u8]) -> RecordResult {
    let raw = null_terminated(payload);
    let calibration = read_f32(tag, payload, raw.len() + 1)?;
    Ok((
        MetadataRecord::FieldOfView { text : decode_cp1252(raw), calibration },
        raw.len() + 5,
    ))
}

/// `f32 seconds, u8 averaging`. The record is always 6 bytes long.
pub fn parse_camera_exposure(tag : u8, payload : &[u8]) -> RecordResult {
    let seconds = read_f32(tag, payload, 0)?;
    let averaging = read_u8(tag, payload, 4)?;
    Ok((MetadataRecord::CameraExposure { seconds, averaging }, 6))
}

/// `name, \0, unit, \0, f32`
pub fn parse_gauge(tag : u8, payload : &[u8]) -> RecordResult {
    let name = null_terminated(payload);
    let rest = payload.get(name.len() + 1..).ok_or(RecordError::Truncated {
        tag,
        needed : name.len() + 1,
        available : payload.len(),
    })?;
    let unit = null_terminated(rest);
    let value = read_f32(tag, payload, name.len() + unit.len() + 2)?;
    Ok((
        MetadataRecord::Gauge {
            name : decode_cp1252(name),
            unit : decode_cp1252(unit),
            value,
        },
        name.len() + unit.len() + 6,
    ))
}

/// Mitutoyo micrometer readings, `f32 x, f32 y` in mm
pub fn parse_stage_position(tag : u8, payload : &[u8]) -> RecordResult {
    let x = read_f32(tag, payload, 0)?;
    let y = read_f32(tag, payload, 4)?;
    Ok((MetadataRecord::StagePosition { x, y }, 8))
}

/// A single null-terminated string
pub fn parse_image_title(_tag : u8, payload : &[u8]) -> RecordResult {
    let raw = null_terminated(payload);
    Ok((MetadataRecord::ImageTitle(decode_cp1252(raw)), raw.len() + 1))
}

/// One state byte, tag 240 is mirror 1 and 242 is mirror 2
pub fn parse_mirror_state(tag : u8, payload : &[u8]) -> RecordResult {
    let state = read_u8(tag, payload, 0)?;
    let index = if tag == 240 { 1 } else { 2 };
    Ok((MetadataRecord::MirrorState { index, state }, 2))
}

/// `f32` volts, tag 243 is the screen and 244 the channelplate
pub fn parse_mcp(tag : u8, payload : &[u8]) -> RecordResult {
    let volts = read_f32(tag, payload, 0)?;
    let plate = if tag == 243 { McpPlate::Screen } else { McpPlate::ChannelPlate };
    Ok((MetadataRecord::Mcp { plate, volts }, 4))
}

const fn build_parser_table() -> [Option<RecordParser>; 256] {
    let mut table : [Option<RecordParser>; 256] = [None; 256];

    let mut i = 0;
    while i < STANDARD_TAGS.len() {
        table[STANDARD_TAGS[i] as usize] = Some(parse_standard_field as RecordParser);
        i += 1;
    }
    let mut i = 0;
    while i < GAUGE_TAGS.len() {
        table[GAUGE_TAGS[i] as usize] = Some(parse_gauge as RecordParser);
        i += 1;
    }

    table[FOV_TAG as usize] = Some(parse_field_of_view as RecordParser);
    table[104] = Some(parse_camera_exposure as RecordParser);
    table[100] = Some(parse_stage_position as RecordParser);
    table[233] = Some(parse_image_title as RecordParser);
    table[240] = Some(parse_mirror_state as RecordParser);
    table[242] = Some(parse_mirror_state as RecordParser);
    table[243] = Some(parse_mcp as RecordParser);
    table[244] = Some(parse_mcp as RecordParser);
    table
}

/// Tag byte -> record parser. `None` for unknown tags and the end tag.
pub static RECORD_PARSERS : [Option<RecordParser>; 256] = build_parser_table();

/// Returns the parser for `tag`, if its shape is known
pub fn parser_for(tag : u8) -> Option<RecordParser> {
    RECORD_PARSERS[tag as usize]
}
