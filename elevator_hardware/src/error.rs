use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("key reader disconnected")]
    Disconnected,
    #[error("grid cell out of range: ({0}, {1})")]
    OutOfRange(u8, u8),
    #[error("no such digit: {0}")]
    BadDigit(u8),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
