use serde::{Serialize, Serializer};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::index::RecordIndexEntry;

/// Invalid window parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("{name} must not be negative (got {value})")]
    NegativeBound { name: &'static str, value: i64 },
    #[error("window end {to} is before its start {from}")]
    Inverted { from: i64, to: i64 },
    #[error("stride must be at least 1 (got {by})")]
    Stride { by: i64 },
    #[error("time window end is before its start")]
    InvertedTime,
}

/// Inclusive record window `[from, to]` with stride `by`, addressed over
/// the valid-only subsequence.
///
/// # Examples
/// ```
/// use tidescan_core::ExtractionWindow;
///
/// let window = ExtractionWindow::new(2, 5, 2)?;
/// assert_eq!(window.positions(8).collect::<Vec<_>>(), vec![2, 4]);
/// # Ok::<(), tidescan_core::WindowError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractionWindow {
    from: usize,
    to: usize,
    by: usize,
}

impl ExtractionWindow {
    /// # Errors
    /// `WindowError` for negative bounds, `to < from` or `by < 1`.
    pub fn new(from: i64, to: i64, by: i64) -> Result<Self, WindowError> {
        let from_u = non_negative("from", from)?;
        let to_u = non_negative("to", to)?;
        if to < from {
            return Err(WindowError::Inverted { from, to });
        }
        if by < 1 {
            return Err(WindowError::Stride { by });
        }
        Ok(Self {
            from: from_u,
            to: to_u,
            by: usize::try_from(by).unwrap_or(usize::MAX),
        })
    }

    pub fn all() -> Self {
        Self {
            from: 0,
            to: usize::MAX,
            by: 1,
        }
    }

    /// First logical index selected.
    pub fn first(&self) -> usize {
        self.from
    }

    /// Last logical index the window may select.
    pub fn last(&self) -> usize {
        self.to
    }

    pub fn by(&self) -> usize {
        self.by
    }

    /// Logical positions selected out of `count` valid records.
    pub fn positions(&self, count: usize) -> impl Iterator<Item = usize> + use<> {
        let end = if count == 0 {
            0
        } else {
            self.to.min(count - 1) + 1
        };
        (self.from..end).step_by(self.by)
    }
}

impl Default for ExtractionWindow {
    fn default() -> Self {
        Self::all()
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize, WindowError> {
    usize::try_from(value).map_err(|_| WindowError::NegativeBound { name, value })
}

/// Inclusive time window over embedded record timestamps, with stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    #[serde(serialize_with = "rfc3339")]
    start: OffsetDateTime,
    #[serde(serialize_with = "rfc3339")]
    end: OffsetDateTime,
    by: usize,
}

impl TimeWindow {
    /// # Errors
    /// `WindowError` when `end < start` or `by < 1`.
    pub fn new(start: OffsetDateTime, end: OffsetDateTime, by: i64) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::InvertedTime);
        }
        if by < 1 {
            return Err(WindowError::Stride { by });
        }
        Ok(Self {
            start,
            end,
            by: usize::try_from(by).unwrap_or(usize::MAX),
        })
    }

    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    pub fn by(&self) -> usize {
        self.by
    }

    fn contains(&self, entry: &RecordIndexEntry) -> bool {
        entry
            .time()
            .map(|t| t.to_offset())
            .is_some_and(|t| self.start <= t && t <= self.end)
    }
}

fn rfc3339<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

/// Which valid records a scan returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    Records(ExtractionWindow),
    Time(TimeWindow),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Records(ExtractionWindow::all())
    }
}

impl From<ExtractionWindow> for Selection {
    fn from(window: ExtractionWindow) -> Self {
        Selection::Records(window)
    }
}

impl From<TimeWindow> for Selection {
    fn from(window: TimeWindow) -> Self {
        Selection::Time(window)
    }
}

impl Selection {
    /// Pick entries out of the valid-only subsequence, paired with their
    /// logical index in it.
    pub fn apply<'a>(&self, valid: &[&'a RecordIndexEntry]) -> Vec<(usize, &'a RecordIndexEntry)> {
        match self {
            Selection::Records(window) => window
                .positions(valid.len())
                .map(|i| (i, valid[i]))
                .collect(),
            Selection::Time(window) => valid
                .iter()
                .enumerate()
                .filter(|(_, entry)| window.contains(entry))
                .step_by(window.by)
                .map(|(i, entry)| (i, *entry))
                .collect(),
        }
    }
}
