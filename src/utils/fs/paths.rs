//! Path utilities for project root discovery and safety checks.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::constants::PROJECT_MARKER_DIR;
use crate::core::StrataError;

/// Finds the project root by walking up from `start`.
///
/// The project root is the first directory (starting with `start` itself)
/// that contains a `strata/` subdirectory. The returned path is canonical when
/// `start` exists.
///
/// # Errors
///
/// Returns [`StrataError::ProjectRootNotFound`] when the filesystem root is
/// reached without finding the marker directory.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let mut current = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    loop {
        if current.join(PROJECT_MARKER_DIR).is_dir() {
            tracing::debug!("Project root: {}", current.display());
            return Ok(current);
        }

        if !current.pop() {
            return Err(StrataError::ProjectRootNotFound {
                start: start.display().to_string(),
            }
            .into());
        }
    }
}

/// Returns true for directories that must never be deleted recursively:
/// the filesystem root and the user's home directory.
#[must_use]
pub fn is_critical_dir(path: &Path) -> bool {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if resolved.parent().is_none() {
        return true;
    }
    match dirs::home_dir() {
        Some(home) => resolved == home.canonicalize().unwrap_or(home),
        None => false,
    }
}
