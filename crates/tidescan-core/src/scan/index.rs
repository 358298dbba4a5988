use serde::Serialize;

use crate::formats::FrameMeta;
use crate::formats::common::{Candidate, RecordTime, Validity};

/// One located frame, valid or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordIndexEntry {
    /// Byte offset of the sync pattern.
    pub offset: usize,
    /// Bytes the frame spans, header and trailing checksum included.
    pub length: usize,
    pub header_len: usize,
    pub payload_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<FrameMeta>,
    pub validity: Validity,
}

impl RecordIndexEntry {
    pub fn from_candidate(offset: usize, candidate: Candidate) -> Self {
        Self {
            offset,
            length: candidate.length,
            header_len: candidate.header_len,
            payload_len: candidate.payload_len,
            meta: candidate.meta,
            validity: candidate.validity,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn payload_offset(&self) -> usize {
        self.offset + self.header_len
    }

    pub fn time(&self) -> Option<RecordTime> {
        self.meta.as_ref().and_then(FrameMeta::time)
    }

    fn clip_to(&mut self, end: usize) {
        self.length = end - self.offset;
        self.header_len = self.header_len.min(self.length);
        self.payload_len = self.payload_len.min(self.length - self.header_len);
    }
}

/// Per-validity entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexCounts {
    pub valid: usize,
    pub checksum_failed: usize,
    pub malformed: usize,
    pub truncated: usize,
}

impl IndexCounts {
    pub fn invalid(&self) -> usize {
        self.checksum_failed + self.malformed + self.truncated
    }
}

/// Ordered, non-overlapping frames located in one byte source.
///
/// Entries are stored contiguously and addressed by position; the index is
/// built and discarded within one call.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    entries: Vec<RecordIndexEntry>,
}

impl RecordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry that starts after the previous one.
    ///
    /// A frame may start inside the span an earlier invalid entry claimed;
    /// that entry is clipped to end where the new one begins.
    pub(crate) fn push(&mut self, entry: RecordIndexEntry) {
        if let Some(prev) = self.entries.last_mut() {
            debug_assert!(entry.offset > prev.offset, "entries must be pushed in order");
            if prev.end() > entry.offset {
                debug_assert!(!prev.validity.is_valid(), "valid frames are never re-entered");
                prev.clip_to(entry.offset);
            }
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RecordIndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The valid-only subsequence that windows address.
    pub fn valid_entries(&self) -> impl Iterator<Item = &RecordIndexEntry> {
        self.entries.iter().filter(|e| e.validity.is_valid())
    }

    pub fn invalid_entries(&self) -> impl Iterator<Item = &RecordIndexEntry> {
        self.entries.iter().filter(|e| !e.validity.is_valid())
    }

    pub fn counts(&self) -> IndexCounts {
        let mut counts = IndexCounts::default();
        for entry in &self.entries {
            match entry.validity {
                Validity::Valid => counts.valid += 1,
                Validity::ChecksumFailed => counts.checksum_failed += 1,
                Validity::Malformed => counts.malformed += 1,
                Validity::Truncated => counts.truncated += 1,
            }
        }
        counts
    }

    /// Bytes covered by entries of any validity.
    pub fn covered_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.length).sum()
    }
}
