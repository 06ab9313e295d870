//! Core types for Strata
//!
//! This module holds the pieces every other module depends on: the
//! [`StrataError`] enum used to signal domain failures, and the
//! [`ErrorContext`] wrapper that turns any error into a message with details
//! and a suggestion for the terminal.
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use strata_cli::core::{StrataError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(StrataError::ProjectRootNotFound {
//!         start: "/tmp".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     friendly.display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, StrataError, user_friendly_error};
