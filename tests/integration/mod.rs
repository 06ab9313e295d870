//! Integration test suite for Strata
//!
//! Drives the `strata` binary end to end against temporary projects and user
//! roots.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **build**: composition, scoping, env layering and build failures
//! - **init**: scaffolding and the setup → init → build workflow
//! - **setup**: library installation and removal

#[path = "../common/mod.rs"]
mod common;

mod build;
mod init;
mod setup;
