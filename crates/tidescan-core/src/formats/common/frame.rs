use serde::Serialize;

use crate::formats::FrameMeta;

/// Classification of one located frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    Valid,
    /// Stored checksum disagrees with the recomputed one.
    ChecksumFailed,
    /// Header fields are structurally implausible.
    Malformed,
    /// The stream ends before the declared frame does.
    Truncated,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

/// What a format probe found at a sync offset.
///
/// `length` never reaches past the end of the buffer the probe was given;
/// truncated candidates are clipped to the bytes actually present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub length: usize,
    pub header_len: usize,
    pub payload_len: usize,
    pub meta: Option<FrameMeta>,
    pub validity: Validity,
}

impl Candidate {
    pub(crate) fn valid(length: usize, header_len: usize, payload_len: usize, meta: FrameMeta) -> Self {
        Self {
            length,
            header_len,
            payload_len,
            meta: Some(meta),
            validity: Validity::Valid,
        }
    }

    pub(crate) fn invalid(length: usize, validity: Validity) -> Self {
        Self {
            length,
            header_len: 0,
            payload_len: 0,
            meta: None,
            validity,
        }
    }

    /// Truncated candidate covering everything left in the buffer.
    pub(crate) fn truncated(remaining: usize) -> Self {
        Self::invalid(remaining, Validity::Truncated)
    }
}
