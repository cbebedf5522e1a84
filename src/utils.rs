//! Utility functions for on-disk artifact removal

use std::io;
use std::path::Path;

/// What kind of artifact was removed from disk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovedArtifact {
    /// A single file was deleted
    File,
    /// A directory tree was deleted recursively
    Directory,
}

/// Delete a download artifact from disk
///
/// Directories are removed recursively, files individually. Returns
/// `Ok(None)` when the path does not exist; the download client may already
/// have cleaned up after itself.
///
/// # Errors
///
/// Propagates the underlying I/O error when the path exists but cannot be
/// removed (permissions, still-open handles on some platforms).
pub fn remove_path(path: &Path) -> io::Result<Option<RemovedArtifact>> {
    if !path.exists() {
        return Ok(None);
    }

    if path.is_dir() {
        std::fs::remove_dir_all(path)?;
        Ok(Some(RemovedArtifact::Directory))
    } else {
        std::fs::remove_file(path)?;
        Ok(Some(RemovedArtifact::File))
    }
}
