use crate::data::image::DimensionsError;

/// Errors that can occur while decoding a `.dat` file,
/// either from the file reader (the `IOError` variant),
/// from a file that ends before its declared layout does,
/// or from the values in the file (e.g. incompatible dimensions).
///
/// Problems with the metadata block are not represented here:
/// a short block or a bad record is logged and decoding goes on.
#[derive(Debug, thiserror::Error)]
pub enum LeemError {
    #[error("IOError: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Truncated header: {0}")]
    TruncatedHeader(String),

    #[error("Truncated pixel payload: expected {expected} bytes, file holds {available}")]
    TruncatedPixels { expected : u64, available : u64 },

    #[error("FormatError: {0}")]
    FormatError(String),

    #[error("DimensionsError: {0}")]
    DimensionsError(#[from] DimensionsError),
}

impl From<binrw::Error> for LeemError {
    fn from(err : binrw::Error) -> Self {
        // The binrw backtrace names the field that was being parsed
        if err.is_eof() {
            LeemError::TruncatedHeader(err.to_string())
        } else {
            LeemError::FormatError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::BinRead;

    #[derive(BinRead, Debug)]
    #[br(little)]
    struct Pair {
        _first : u16,
        _second : u16,
    }

    #[test]
    fn eof_becomes_truncated_header_naming_field() {
        let mut cursor = binrw::io::Cursor::new(vec![1u8, 0, 2]);
        let err : LeemError = Pair::read(&mut cursor).unwrap_err().into();
        match err {
            LeemError::TruncatedHeader(msg) => assert!(msg.contains("_second"), "{}", msg),
            other => panic!("Unexpected error {:?}", other),
        }
    }

    #[test]
    fn dimension_errors_convert() {
        let err : LeemError = DimensionsError::ZeroSized { xdim : 0, ydim : 3 }.into();
        assert!(matches!(err, LeemError::DimensionsError(_)));
    }
}
