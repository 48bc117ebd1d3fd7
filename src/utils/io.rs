//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// A missing file maps to `ProjectFileNotFound` so callers can skip it;
/// everything else is `InternalIoError` tagged with `operation`.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::project_file_not_found(path.display().to_string()),
        _ => Error::internal_io(e.to_string(), Some(operation.to_string())),
    })
}

/// Write content to file with standardized error handling.
///
/// Writes in place; there is no temp file or rename.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}
