use thiserror::Error;

use super::window::WindowError;
use crate::formats::common::{CursorError, Validity};
use crate::formats::echo::PingError;
use crate::formats::sontek::SontekError;
use crate::source::SourceError;

/// Caller-supplied parameters that contradict each other or the data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid window: {0}")]
    Window(#[from] WindowError),
    #[error("invalid ping parameters: {0}")]
    Ping(#[from] PingError),
    #[error("section '{section}' requested but its sensor is not installed (profile at offset {offset})")]
    SectionNotInstalled { section: &'static str, offset: usize },
    #[error("record at offset {offset} is {validity:?}; only valid records can be decoded")]
    RecordNotValid { offset: usize, validity: Validity },
}

/// Fatal outcome of a scan or decode call.
///
/// Corrupted or truncated frames are never errors; they are reported as
/// index entries.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("internal offset error: {0}")]
    OutOfRange(#[from] CursorError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl From<SontekError> for ScanError {
    fn from(err: SontekError) -> Self {
        match err {
            SontekError::SectionNotInstalled { section, offset } => {
                ConfigError::SectionNotInstalled { section, offset }.into()
            }
            SontekError::Cursor(err) => ScanError::OutOfRange(err),
        }
    }
}

impl From<WindowError> for ScanError {
    fn from(err: WindowError) -> Self {
        ConfigError::from(err).into()
    }
}

impl From<PingError> for ScanError {
    fn from(err: PingError) -> Self {
        ConfigError::from(err).into()
    }
}

impl ScanError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ScanError::Configuration(_))
    }
}
