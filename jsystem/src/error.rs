use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("needed {needed} bytes at offset {offset:#x}, only {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("malformed container: {0}")]
    MalformedContainer(String),
    #[error("unsupported format {0:#04x}")]
    UnsupportedFormat(u8),
    #[error("index {index} out of range for table of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
