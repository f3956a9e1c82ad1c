use thiserror::Error;

/// Raw status reported by a conversion backend for corrupt input.
pub const STATUS_CORRUPT: i64 = -1;

/// Raw status reported by a conversion backend for an undersized destination.
pub const STATUS_DST_TOO_SMALL: i64 = -2;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Corrupt input")]
    Corrupt,

    #[error("Destination buffer too small")]
    DstTooSmall,

    #[error("Unexpected conversion status: {0}")]
    UnexpectedStatus(i64),
}

impl ConvertError {
    /// Maps a negative backend status code onto an error.
    #[must_use]
    pub const fn from_status(code: i64) -> Self {
        match code {
            STATUS_CORRUPT => Self::Corrupt,
            STATUS_DST_TOO_SMALL => Self::DstTooSmall,
            other => Self::UnexpectedStatus(other),
        }
    }

    /// Whether the whole block may be retried with a larger destination.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::DstTooSmall)
    }
}

pub type Result<T> = core::result::Result<T, ConvertError>;
