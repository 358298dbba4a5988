use thiserror::Error;

use crate::formats::common::CursorError;

/// Errors raised while locating flagged-section profiles.
///
/// # Examples
/// ```
/// use tidescan_core::SontekError;
///
/// let err = SontekError::SectionNotInstalled { section: "ctd", offset: 0 };
/// assert!(err.to_string().contains("not installed"));
/// ```
#[derive(Debug, Error)]
pub enum SontekError {
    #[error("section '{section}' requested but its sensor is not installed (profile at offset {offset})")]
    SectionNotInstalled { section: &'static str, offset: usize },
    #[error(transparent)]
    Cursor(#[from] CursorError),
}
