//! Atomic file write operations using temp-and-rename strategy.
//!
//! Rendered stacks are written through here so a failed or interrupted write
//! never leaves a truncated output file behind.

use crate::utils::fs::dirs::ensure_dir;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`].
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// The content is written to a named temporary file in the target's directory,
/// synced to disk and then persisted over the target path. Parent directories
/// are created if missing.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut file = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    file.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    file.persist(path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
