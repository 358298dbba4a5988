//! Instrument frame formats.
//!
//! Each family follows the same layered structure:
//! - `layout`: byte offsets, sync patterns and sizes (source of truth)
//! - `parser`: classifies one candidate frame at a sync offset
//! - `error`: explicit errors where a family can fail a call
//!
//! Shared byte access and checksums live in `common`. Parsers are pure and
//! contain no I/O or scanning loop; the `scan` layer owns both.

pub mod ad2cp;
pub mod common;
pub mod echo;
pub mod rdi;
pub mod sontek;

use serde::Serialize;

use ad2cp::Ad2cpMeta;
use rdi::RdiMeta;
use sontek::SontekMeta;

pub use common::RecordTime;

/// Instrument family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    /// Compact self-describing frames.
    Ad2cp,
    /// Fixed-sync checksummed ensembles.
    Rdi,
    /// Flagged-section profiles.
    Sontek,
}

impl FormatTag {
    pub fn name(self) -> &'static str {
        match self {
            FormatTag::Ad2cp => "ad2cp",
            FormatTag::Rdi => "rdi",
            FormatTag::Sontek => "sontek",
        }
    }

    pub fn sync_pattern(self) -> &'static [u8] {
        match self {
            FormatTag::Ad2cp => ad2cp::layout::SYNC_PATTERN,
            FormatTag::Rdi => rdi::layout::SYNC_PATTERN,
            FormatTag::Sontek => sontek::layout::SYNC_PATTERN,
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-family metadata of a located frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum FrameMeta {
    Ad2cp(Ad2cpMeta),
    Rdi(RdiMeta),
    Sontek(SontekMeta),
}

impl FrameMeta {
    pub fn time(&self) -> Option<RecordTime> {
        match self {
            FrameMeta::Ad2cp(meta) => meta.time,
            FrameMeta::Rdi(meta) => meta.time,
            FrameMeta::Sontek(meta) => meta.time,
        }
    }
}
