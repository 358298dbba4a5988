//! Scan driver: turns a byte source into a record index, then selects
//! records out of it.
//!
//! The loop is shared by every instrument family. For each occurrence of the
//! family's sync pattern the family `probe` classifies one candidate frame;
//! valid frames are skipped whole, anything else advances one byte so a
//! corrupted frame never hides the next good one.
//!
//! Invariants:
//! - Entry offsets strictly increase and entries never overlap.
//! - No entry reaches past the end of the source.
//! - An invalid candidate inside the span of the previous recorded invalid
//!   entry is not recorded; a valid frame there clips that entry.

mod error;
mod index;
mod ping;
mod window;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::formats::common::{ByteCursor, Candidate};
use crate::formats::sontek::SontekSections;
use crate::formats::{FormatTag, ad2cp, rdi, sontek};
use crate::source::ByteSource;
use crate::{ScanReport, ScanSummary, SelectedRecord, make_stub_report};

pub use error::{ConfigError, ScanError};
pub use index::{IndexCounts, RecordIndex, RecordIndexEntry};
pub use ping::{PingRecord, decode_ping_record, decode_pings};
pub use window::{ExtractionWindow, Selection, TimeWindow, WindowError};

/// Shared flag that stops a running scan between candidates.
///
/// # Examples
/// ```
/// use tidescan_core::CancelFlag;
///
/// let flag = CancelFlag::new();
/// let handle = flag.clone();
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-call scan settings.
///
/// The default selects every valid record, assumes no flagged sections
/// were recorded and places no limit on the number of records.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub selection: Selection,
    /// Only used by the flagged-section family.
    pub sections: SontekSections,
    /// Stop after this many valid records.
    pub max_records: Option<usize>,
    pub cancel: Option<CancelFlag>,
}

impl ScanOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

/// Record index of one source plus whether the scan ran to completion.
#[derive(Debug, Clone, Default)]
pub struct Located {
    pub index: RecordIndex,
    pub cancelled: bool,
}

/// Closed set of frame locators, one per family.
#[derive(Debug, Clone, Copy)]
enum Locator {
    Ad2cp,
    Rdi,
    Sontek(SontekSections),
}

impl Locator {
    fn new(format: FormatTag, options: &ScanOptions) -> Self {
        match format {
            FormatTag::Ad2cp => Locator::Ad2cp,
            FormatTag::Rdi => Locator::Rdi,
            FormatTag::Sontek => Locator::Sontek(options.sections),
        }
    }

    fn probe(&self, cursor: ByteCursor<'_>, offset: usize) -> Result<Candidate, ScanError> {
        match self {
            Locator::Ad2cp => Ok(ad2cp::probe(cursor, offset)?),
            Locator::Rdi => Ok(rdi::probe(cursor, offset)?),
            Locator::Sontek(sections) => Ok(sontek::probe(cursor, offset, sections)?),
        }
    }
}

/// Build the record index of `bytes` for one instrument family.
///
/// A truncated entry does not end the scan: searching continues inside its
/// span, so a valid frame hidden behind a corrupted length is still found
/// and the truncated entry is clipped to end where that frame starts.
///
/// # Examples
/// ```
/// use tidescan_core::{FormatTag, ScanOptions, locate};
///
/// let located = locate(&[0u8; 64], FormatTag::Ad2cp, &ScanOptions::default())?;
/// assert!(located.index.is_empty());
/// # Ok::<(), tidescan_core::ScanError>(())
/// ```
///
/// # Errors
/// `ScanError::Configuration` when the options contradict the data, and
/// `ScanError::OutOfRange` if a probe reads outside the buffer.
pub fn locate(bytes: &[u8], format: FormatTag, options: &ScanOptions) -> Result<Located, ScanError> {
    let locator = Locator::new(format, options);
    let cursor = ByteCursor::new(bytes);
    let sync = format.sync_pattern();

    let mut located = Located::default();
    let mut pos = 0usize;
    let mut shadow_end = 0usize;
    let mut valid = 0usize;

    while let Some(offset) = cursor.find(pos, sync) {
        if options.max_records.is_some_and(|max| valid >= max) {
            break;
        }
        if options.is_cancelled() {
            tracing::warn!(format = %format, offset, "scan cancelled");
            located.cancelled = true;
            break;
        }

        let candidate = locator.probe(cursor, offset)?;
        if candidate.validity.is_valid() {
            located
                .index
                .push(RecordIndexEntry::from_candidate(offset, candidate));
            valid += 1;
            shadow_end = 0;
            pos = offset + candidate.length;
            continue;
        }

        if offset >= shadow_end {
            tracing::debug!(
                format = %format,
                offset,
                length = candidate.length,
                validity = ?candidate.validity,
                "invalid frame"
            );
            located
                .index
                .push(RecordIndexEntry::from_candidate(offset, candidate));
            shadow_end = offset + candidate.length;
        }
        pos = offset + 1;
    }

    Ok(located)
}

/// Scan an in-memory buffer and build a report of the selected records.
///
/// # Errors
/// See [`locate`].
pub fn scan_bytes(
    name: &str,
    bytes: &[u8],
    format: FormatTag,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let located = locate(bytes, format, options)?;
    let index = &located.index;
    let counts = index.counts();

    let valid: Vec<&RecordIndexEntry> = index.valid_entries().collect();
    let records: Vec<SelectedRecord> = options
        .selection
        .apply(&valid)
        .into_iter()
        .map(|(logical_index, entry)| SelectedRecord {
            logical_index,
            entry: *entry,
        })
        .collect();

    let times = valid.iter().filter_map(|e| e.time());
    let time_start = times.clone().min();
    let time_end = times.max();

    tracing::info!(
        format = %format,
        input = name,
        valid = counts.valid,
        invalid = counts.invalid(),
        selected = records.len(),
        cancelled = located.cancelled,
        "scan complete"
    );

    let mut report = make_stub_report(name, bytes.len() as u64, format);
    report.selection = options.selection;
    if format == FormatTag::Sontek {
        report.sections = Some(options.sections);
    }
    report.summary = ScanSummary {
        records_total: index.len(),
        valid: counts.valid,
        checksum_failed: counts.checksum_failed,
        malformed: counts.malformed,
        truncated: counts.truncated,
        selected: records.len(),
        uncovered_bytes: bytes.len().saturating_sub(index.covered_bytes()),
        cancelled: located.cancelled,
        time_start,
        time_end,
    };
    report.records = records;
    report.invalid = index.invalid_entries().copied().collect();
    Ok(report)
}

/// Scan a file; the file is mapped read-only and its handle closed before
/// scanning starts.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use tidescan_core::{FormatTag, ScanOptions, scan_file};
///
/// let report = scan_file(Path::new("deployment.ad2cp"), FormatTag::Ad2cp, &ScanOptions::default())?;
/// println!("{} valid records", report.summary.valid);
/// # Ok::<(), tidescan_core::ScanError>(())
/// ```
///
/// # Errors
/// `ScanError::Source` when the file cannot be mapped, otherwise as [`locate`].
pub fn scan_file(
    path: &Path,
    format: FormatTag,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let source = ByteSource::map(path)?;
    scan_bytes(
        &path.display().to_string(),
        source.as_bytes(),
        format,
        options,
    )
}
