//! Methods for reading files

use std::path;

use fs_err as fs;

use crate::error::LoadError;

/// Returns the raw contents of a file at `path`
///
/// Decoding is left to the parser so that a file with invalid text reads as malformed, not as
/// unreadable.
///
/// # Errors
///
/// The path does not exist or the file cannot be read.
pub(crate) fn read_file(path: &path::Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })
}
