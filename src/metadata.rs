//! The `Metadata` module parses the microscope settings stored
//! in the tagged block that follows the fixed header. Each record
//! starts with a one-byte tag selecting its binary shape; the
//! shapes and their parsers live in `records`, the walk over the
//! block in `decoder`.

mod decoder;
mod records;
mod units;
mod values;

use std::io::{Read, Seek, SeekFrom};

use tracing::warn;

use crate::file_data::header::{FileHeader, CUSTOM_METADATA_SKIP, STANDARD_METADATA_LEN};
use crate::utils::LeemError;

pub use decoder::{decode_metadata, DecodedMetadata, RecordIterator};
pub use records::{
    parser_for, McpPlate, MetadataRecord, RecordError, RecordParser,
    END_TAG, FOV_TAG, GAUGE_TAGS, STANDARD_TAGS,
};
pub use units::Unit;
pub use values::{Averaging, FieldOfView, Metadata, MetadataValue};

/// Reads the raw metadata block. Expects `reader` to sit right
/// after the fixed header.
///
/// With `metadata_block_version == 2` this is the next 256 bytes.
/// Otherwise 388 bytes are skipped and `metadata_block_version`
/// bytes are read.
///
/// A file ending inside the block is not an error: the bytes that
/// are there are returned and a warning is logged, since the pixels
/// are found from the end of the file regardless.
///
/// ## Errors
///
/// * `LeemError::IOError` - if the reader fails
pub fn read_metadata_block<R : Read + Seek>(
    reader : &mut R,
    header : &FileHeader,
) -> Result<Vec<u8>, LeemError> {
    let expected = if header.has_standard_metadata_block() {
        STANDARD_METADATA_LEN as u64
    } else {
        reader.seek(SeekFrom::Current(CUSTOM_METADATA_SKIP))?;
        header.metadata_block_version as u64
    };

    let mut block = Vec::with_capacity(expected as usize);
    reader.by_ref().take(expected).read_to_end(&mut block)?;
    if (block.len() as u64) < expected {
        warn!(expected, available = block.len(), "File ends inside the metadata block");
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{standard_record, SyntheticFile};
    use binrw::io::Cursor;

    #[test]
    fn standard_block_is_256_bytes() {
        let bytes = SyntheticFile::new(2, 2).bytes();
        let mut cursor = Cursor::new(bytes);
        let header = FileHeader::from_reader(&mut cursor).unwrap();
        let block = read_metadata_block(&mut cursor, &header).unwrap();
        assert_eq!(block.len(), 256);
        assert_eq!(block[0], END_TAG);
        assert_eq!(cursor.position(), 132 + 256);
    }

    #[test]
    fn custom_block_skips_388_bytes() {
        let mut records = standard_record(38, "Objective", b'1', 1.0);
        records.push(END_TAG);
        let file = SyntheticFile::new(2, 2).custom_records(records.clone());
        let mut cursor = Cursor::new(file.bytes());

        let header = FileHeader::from_reader(&mut cursor).unwrap();
        assert_eq!(header.metadata_block_version as usize, records.len());
        let block = read_metadata_block(&mut cursor, &header).unwrap();
        assert_eq!(block, records);
        assert_eq!(
            decode_metadata(&block).metadata.quantity("Objective"),
            Some((1.0, "V"))
        );
    }

    #[test]
    fn short_block_returns_what_is_there() {
        let file = SyntheticFile::new(2, 2);
        let mut bytes = file.header_bytes();
        bytes.extend([END_TAG; 100]);
        let mut cursor = Cursor::new(bytes);
        let header = FileHeader::from_reader(&mut cursor).unwrap();
        let block = read_metadata_block(&mut cursor, &header).unwrap();
        assert_eq!(block, vec![END_TAG; 100]);
        assert_eq!(cursor.position(), 132 + 100);
    }

    #[test]
    fn short_custom_block_returns_what_is_there() {
        let mut records = standard_record(38, "Objective", b'1', 1.0);
        records.push(END_TAG);
        let file = SyntheticFile::new(2, 2).custom_records(records);
        let mut bytes = file.header_bytes();
        bytes.extend([0u8; 390]);
        let mut cursor = Cursor::new(bytes);
        let header = FileHeader::from_reader(&mut cursor).unwrap();
        assert_eq!(read_metadata_block(&mut cursor, &header).unwrap(), vec![0u8; 2]);
    }
}
