//! File system utilities
//!
//! Directory creation and removal, atomic file writes and upward project root
//! discovery. Every function returns `anyhow::Result` with the offending path
//! attached as context.
//!
//! # Examples
//!
//! ```rust,no_run
//! use strata_cli::utils::fs::{ensure_dir, reset_dir, safe_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! reset_dir(Path::new("strata/build"))?;
//! ensure_dir(Path::new("strata/build/sub"))?;
//! safe_write(Path::new("docker-compose.yml"), "services: {}\n")?;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod paths;

// Directory operations
pub use dirs::{ensure_dir, ensure_parent_dir, remove_dir_all, reset_dir};

// Atomic write operations
pub use atomic::{atomic_write, safe_write};

// Path utilities
pub use paths::{find_project_root, is_critical_dir};
