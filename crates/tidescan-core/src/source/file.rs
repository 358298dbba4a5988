use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use super::error::SourceError;

/// Read a whole file into memory.
///
/// The handle lives only inside this call and is closed on every return
/// path, including read failures.
///
/// # Errors
/// Returns `SourceError::Io` when the file cannot be opened or read.
pub fn read_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    let mut file = File::open(path).map_err(|source| io_error(path, source))?;
    let capacity = file_len(&file, path)?;
    read_to_vec(&mut file, capacity).map_err(|source| io_error(path, source))
}

/// Map a whole file read-only. `None` for an empty file, which has
/// nothing to map.
///
/// The mapping outlives the handle, which is closed before returning.
///
/// # Errors
/// Returns `SourceError::Io` when the file cannot be opened or mapped.
pub fn map_file(path: &Path) -> Result<Option<Mmap>, SourceError> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    if file_len(&file, path)? == 0 {
        return Ok(None);
    }
    // SAFETY: the mapping is only ever read, and callers keep the file
    // from being truncated while the source is alive.
    let map = unsafe { Mmap::map(&file) }.map_err(|source| io_error(path, source))?;
    Ok(Some(map))
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn file_len(file: &File, path: &Path) -> Result<usize, SourceError> {
    let len = file
        .metadata()
        .map_err(|source| io_error(path, source))?
        .len();
    usize::try_from(len).map_err(|_| SourceError::TooLarge {
        path: path.to_path_buf(),
        len,
    })
}

fn read_to_vec<R: Read>(reader: &mut R, capacity: usize) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(capacity);
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
