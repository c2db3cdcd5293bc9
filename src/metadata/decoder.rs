//! Walks the tagged metadata block record by record and folds the
//! records into a `Metadata` map plus the field of view flags.

use tracing::{error, info, warn};

use crate::metadata::records::{
    parser_for, McpPlate, MetadataRecord, RecordError, END_TAG,
};
use crate::metadata::values::{Averaging, FieldOfView, Metadata, MetadataValue};

/// Iterates over the records of a metadata block, yielding
/// `(position, record)` where `position` is the offset of the tag byte.
///
/// Stops at the end tag, at the end of the block, or after yielding
/// a `Truncated` error. Unknown tags are yielded as
/// `MetadataRecord::Unknown` and are assumed to carry no payload: if
/// they actually do, every record after them is misread.
pub struct RecordIterator<'block> {
    block : &'block [u8],
    position : usize,
    finished : bool,
}

impl<'block> RecordIterator<'block> {
    pub fn new(block : &'block [u8]) -> Self {
        RecordIterator { block, position : 0, finished : false }
    }
}

impl<'block> Iterator for RecordIterator<'block> {
    type Item = (usize, Result<MetadataRecord, RecordError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let position = self.position;
        let tag = match self.block.get(position) {
            Some(&END_TAG) | None => {
                self.finished = true;
                return None;
            }
            Some(&tag) => tag,
        };
        let payload = &self.block[position + 1..];

        let (item, offset) = match parser_for(tag) {
            Some(parse) => match parse(tag, payload) {
                Ok((record, offset)) => (Ok(record), offset),
                Err(err) => match err.offset() {
                    Some(offset) => (Err(err), offset),
                    None => {
                        self.finished = true;
                        (Err(err), 0)
                    }
                },
            },
            None => (Ok(MetadataRecord::Unknown(tag)), 0),
        };

        self.position = position + offset + 1;
        Some((position, item))
    }
}

/// Everything recovered from a metadata block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedMetadata {
    pub metadata : Metadata,
    pub field_of_view : FieldOfView,
    pub is_leed : bool,
}

impl DecodedMetadata {
    /// Folds one record in, logging it
    fn apply(&mut self, position : usize, record : MetadataRecord) {
        match record {
            MetadataRecord::Standard { name, value, unit } => {
                info!(position, name = %name, value, unit = %unit, "Metadata field");
                self.metadata.insert(name, MetadataValue::quantity(value, unit.symbol()));
            },
            MetadataRecord::FieldOfView { text, calibration } => {
                self.apply_field_of_view(&text);
                info!(position, calibration, "FOV cal. factor");
                self.metadata.insert("FOV cal. factor", MetadataValue::Number(calibration));
            },
            MetadataRecord::CameraExposure { seconds, averaging } => {
                info!(
                    position,
                    seconds,
                    averaging,
                    classification = %Averaging::from_byte(averaging),
                    "Camera Exposure"
                );
                self.metadata.insert("Camera Exposure", MetadataValue::quantity(seconds, "s"));
                self.metadata.insert("Average Images", MetadataValue::Integer(averaging as i64));
            },
            MetadataRecord::Gauge { name, unit, value } => {
                info!(position, name = %name, value, unit = %unit, "Pressure gauge");
                self.metadata.insert(name, MetadataValue::Quantity { value, unit });
            },
            MetadataRecord::StagePosition { x, y } => {
                info!(position, x, y, "Mitutoyo position (mm)");
                self.metadata.insert("Mitutoyo X", MetadataValue::quantity(x, "mm"));
                self.metadata.insert("Mitutoyo Y", MetadataValue::quantity(y, "mm"));
            },
            MetadataRecord::ImageTitle(title) => {
                info!(position, title = %title, "Image Title");
                self.metadata.insert("Image Title", MetadataValue::Text(title));
            },
            MetadataRecord::MirrorState { index, state } => {
                info!(position, index, state, "Mirror state");
                self.metadata.insert(format!("MirrorState{}", index), MetadataValue::Integer(state as i64));
            },
            MetadataRecord::Mcp { plate, volts } => {
                let name = match plate {
                    McpPlate::Screen => "MCPscreen",
                    McpPlate::ChannelPlate => "MCPchannelplate",
                };
                info!(position, name, volts, "MCP voltage");
                self.metadata.insert(name, MetadataValue::quantity(volts, "V"));
            },
            MetadataRecord::Unknown(tag) => {
                warn!(
                    tag,
                    position,
                    "Unknown field tag. This and following data fields might be misinterpreted!"
                );
            },
        }
    }

    /// `LEED...` marks a diffraction image, `none...` has no field of
    /// view, anything else should be `<number>µm`.
    fn apply_field_of_view(&mut self, text : &str) {
        if text.starts_with("LEED") {
            info!(fov = "LEED", "Field Of View");
            self.is_leed = true;
            self.field_of_view = FieldOfView::Absent;
        } else if text.starts_with("none") {
            info!(fov = "None", "Field Of View");
            self.field_of_view = FieldOfView::Absent;
        } else {
            self.is_leed = false;
            match parse_micrometers(text) {
                Some(value) => {
                    info!(fov = value, unit = FieldOfView::UNIT, "Field Of View");
                    self.field_of_view = FieldOfView::Micrometers(value);
                },
                None => error!(fov = %text, "FOV field tag: unknown string detected"),
            }
        }
    }
}

/// `"12.5µm"` -> `12.5`
fn parse_micrometers(text : &str) -> Option<f64> {
    text.split(FieldOfView::UNIT).next()?.trim().parse::<f64>().ok()
}

/// Decodes a whole metadata block. Never fails: malformed records
/// are logged and skipped, and a record running off the end of the
/// block ends decoding with whatever was read before it.
pub fn decode_metadata(block : &[u8]) -> DecodedMetadata {
    let mut decoded = DecodedMetadata::default();
    for (position, item) in RecordIterator::new(block) {
        match item {
            Ok(record) => decoded.apply(position, record),
            Err(err @ RecordError::Truncated { .. }) => {
                warn!(position, error = %err, "Metadata block ends inside a record");
            },
            Err(err) => {
                warn!(position, error = %err, "Skipping malformed metadata field");
            },
        }
    }
    decoded
}
