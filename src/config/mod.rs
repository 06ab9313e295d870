//! Configuration management for Strata
//!
//! Strata reads two optional YAML files:
//!
//! 1. **User configuration** (`<user_root>/config.yml`) - location of the
//!    user's block library, scaffolds and lowest-precedence env files
//! 2. **Project configuration** (`<project_root>/.strata.yml`) - project env
//!    layering, profiles and output settings
//!
//! # Modules
//!
//! - `parser` - Generic YAML parsing with file context in errors
//! - `project` - Project root discovery and `.strata.yml`
//! - `user` - User root resolution and `config.yml`
//!
//! # Environment Precedence
//!
//! Values used during rendering come from three env layers, lowest first:
//!
//! 1. user defaults (`config.yml` → `env.defaults`)
//! 2. project defaults (`.strata.yml` → `env.defaults`)
//! 3. the selected profile (`.strata.yml` → `env.profiles.<name>`)

mod parser;
pub mod project;
pub mod user;

pub use parser::{parse_config, parse_config_str};
pub use project::{ProjectConfig, RawProjectConfig};
pub use user::{RawUserConfig, UserConfig};
