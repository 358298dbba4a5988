use thiserror::Error;

/// Errors returned by ping payload decoding.
///
/// Every variant means the caller's ping parameters disagree with the frame;
/// none of them indicates stream corruption.
///
/// # Examples
/// ```
/// use tidescan_core::PingError;
///
/// let err = PingError::PayloadLength { expected: 16, actual: 15 };
/// assert!(err.to_string().contains("expected 16"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PingError {
    #[error("unknown sample type code {code}")]
    UnknownSampleType { code: u8 },
    #[error("{name} must be at least 1")]
    ZeroDimension { name: &'static str },
    #[error("ping dimensions overflow the addressable size")]
    Overflow,
    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    PayloadLength { expected: usize, actual: usize },
}
