//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - File system operations: directory handling, atomic writes and
//!   project root discovery

pub mod fs;

pub use fs::{atomic_write, ensure_dir, find_project_root, reset_dir, safe_write};
