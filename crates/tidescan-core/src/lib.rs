//! tidescan core library for binary oceanographic instrument streams.
//!
//! This crate locates, validates and indexes the frames that acoustic
//! current profilers and echo sounders record to their raw files: the byte
//! source feeds the scan layer, which drives per-family frame parsers
//! (layout/parser/error) and reports the records a window selects. Parsing
//! is byte-oriented and side-effect free; all file access is isolated in
//! `source`.
//!
//! Invariants:
//! - Record indexes are deterministic: offsets strictly increase and
//!   entries never overlap or reach past the end of the source.
//! - Corrupted and truncated frames are reported, never raised.
//! - Windows address valid records only.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use tidescan_core::{FormatTag, ScanOptions, scan_file};
//!
//! let report = scan_file(Path::new("deployment.000"), FormatTag::Rdi, &ScanOptions::default())?;
//! println!("report version: {}", report.report_version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

mod formats;
mod scan;
mod source;

pub use formats::ad2cp::Ad2cpMeta;
pub use formats::common::checksum::{compute as compute_checksum, verify as verify_checksum};
pub use formats::common::{
    BitOrder, ByteCursor, Candidate, ChecksumAlgorithm, ChecksumOutcome, CursorError, RecordTime,
    Validity,
};
pub use formats::echo::{
    DecodedPing, PingError, PingParams, SampleType, Samples, decode_ping, expand_compressed,
};
pub use formats::rdi::RdiMeta;
pub use formats::sontek::{Section, SontekError, SontekMeta, SontekSections};
pub use formats::{FormatTag, FrameMeta};
pub use scan::{
    CancelFlag, ConfigError, ExtractionWindow, IndexCounts, Located, PingRecord, RecordIndex,
    RecordIndexEntry, ScanError, ScanOptions, Selection, TimeWindow, WindowError,
    decode_ping_record, decode_pings, locate, scan_bytes, scan_file,
};
pub use source::{ByteSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Scan report with records in stream order.
///
/// # Examples
/// ```
/// use tidescan_core::{FormatTag, make_stub_report};
///
/// let report = make_stub_report("deployment.ad2cp", 123, FormatTag::Ad2cp);
/// assert_eq!(report.report_version, tidescan_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input source metadata.
    pub input: InputInfo,
    /// Instrument family the source was scanned as.
    pub format: FormatTag,
    /// Records the caller asked for.
    pub selection: Selection,
    /// Flagged sections assumed present (flagged-section family only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<SontekSections>,
    pub summary: ScanSummary,
    /// Selected valid records in stream order.
    pub records: Vec<SelectedRecord>,
    /// Every invalid entry, for diagnostics.
    pub invalid: Vec<RecordIndexEntry>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use tidescan_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "tidescan".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "tidescan");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input source metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path or buffer name as provided to the scanner.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Counts over the whole record index.
///
/// `uncovered_bytes` counts bytes outside every entry: leading garbage,
/// gaps between frames and sync-free tails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    pub records_total: usize,
    pub valid: usize,
    pub checksum_failed: usize,
    pub malformed: usize,
    pub truncated: usize,
    pub selected: usize,
    pub uncovered_bytes: usize,
    /// The scan was stopped before reaching the end of the source.
    pub cancelled: bool,
    /// Earliest embedded timestamp among valid records (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<RecordTime>,
    /// Latest embedded timestamp among valid records (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<RecordTime>,
}

/// A selected record and its position in the valid-only subsequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRecord {
    pub logical_index: usize,
    #[serde(flatten)]
    pub entry: RecordIndexEntry,
}

/// Build a stub report with base fields filled and nothing located.
///
/// # Examples
/// ```
/// use tidescan_core::{FormatTag, make_stub_report};
///
/// let report = make_stub_report("deployment.000", 123, FormatTag::Rdi);
/// assert!(report.records.is_empty());
/// assert_eq!(report.input.bytes, 123);
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64, format: FormatTag) -> ScanReport {
    ScanReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "tidescan".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        format,
        selection: Selection::default(),
        sections: None,
        summary: ScanSummary::default(),
        records: vec![],
        invalid: vec![],
    }
}
