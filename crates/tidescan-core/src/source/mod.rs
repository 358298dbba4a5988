//! Byte sources.
//!
//! All file access is isolated here; locators and decoders only see
//! borrowed byte slices.

mod error;
mod file;

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

pub use error::SourceError;

use crate::formats::common::ByteCursor;

/// Immutable, randomly addressable bytes for one decode call.
///
/// # Examples
/// ```
/// use tidescan_core::ByteSource;
///
/// let source = ByteSource::from_slice(&[0xA5, 0x0A]);
/// assert_eq!(source.len(), 2);
/// assert_eq!(source.cursor().read_u8(0).unwrap(), 0xA5);
/// ```
#[derive(Debug, Clone)]
pub struct ByteSource<'a> {
    backing: Backing<'a>,
}

#[derive(Debug, Clone)]
enum Backing<'a> {
    Memory(Cow<'a, [u8]>),
    Mapped(Arc<Mmap>),
}

impl<'a> ByteSource<'a> {
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self {
            backing: Backing::Memory(Cow::Borrowed(bytes)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Memory(bytes) => &bytes[..],
            Backing::Mapped(map) => &map[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// True when the bytes are a read-only mapping of a file.
    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }

    pub fn cursor(&self) -> ByteCursor<'_> {
        ByteCursor::new(self.as_bytes())
    }
}

impl ByteSource<'static> {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            backing: Backing::Memory(Cow::Owned(bytes)),
        }
    }

    /// Load a file read-only into memory.
    ///
    /// # Errors
    /// Returns `SourceError` when the file cannot be read.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let bytes = file::read_file(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "opened byte source");
        Ok(Self::from_vec(bytes))
    }

    /// Map a file read-only instead of copying it, for multi-gigabyte
    /// deployment files. Empty files fall back to an empty in-memory source.
    ///
    /// The file must not be truncated while the source is alive.
    ///
    /// # Errors
    /// Returns `SourceError` when the file cannot be opened or mapped.
    pub fn map(path: &Path) -> Result<Self, SourceError> {
        let source = match file::map_file(path)? {
            Some(map) => Self {
                backing: Backing::Mapped(Arc::new(map)),
            },
            None => Self::from_vec(Vec::new()),
        };
        tracing::debug!(path = %path.display(), bytes = source.len(), "mapped byte source");
        Ok(source)
    }
}
