// Wed Oct 14 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid memory range: 0x{0:x} - 0x{1:x}")]
    InvalidRange(u64, u64),
    #[error("Out of bounds: address 0x{0:x} not in any mapped range")]
    OutOfBounds(u64),
    #[error("Read of {1} bytes at 0x{0:x} crosses the end of its mapping")]
    ShortRead(u64, usize),
    #[error("Alignment error: address 0x{0:x} not aligned to {1}")]
    AlignmentError(u64, usize),
    #[error("Null address")]
    NullAddress,
    #[error("Image error: {0}")]
    Image(String),
}
