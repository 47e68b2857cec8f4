//! Utility functions for error handling
//!
//! File access with error messages that say what the file was needed for.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Read a file to string, reporting `purpose` when it fails
///
/// # Arguments
/// * `path` - The path to the file to read
/// * `purpose` - Why the file is being read (for error context)
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    if !path.exists() {
        return Err(PipelineError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found (needed for: {purpose})", path.display()),
        )));
    }

    if !path.is_file() {
        return Err(PipelineError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file (expected for: {purpose})", path.display()),
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "permission denied - check file permissions",
            io::ErrorKind::InvalidData => "file is not valid UTF-8",
            _ => "failed to read file",
        };
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("{}: {context} ({purpose}): {e}", path.display()),
        ))
    })
}

/// Read a model artifact, turning every failure into a fatal artifact error
pub fn read_artifact(path: &Path, purpose: &str) -> Result<String> {
    safe_read_to_string(path, purpose).map_err(|e| PipelineError::artifact(path, e.to_string()))
}
