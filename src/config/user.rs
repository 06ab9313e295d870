//! User-level configuration: the template library in the user root.
//!
//! The user root (`~/.strata` unless overridden with `--home` or
//! `STRATA_HOME`) holds blocks shared across projects, default environment
//! files and scaffolds. It is passed explicitly to every component that needs
//! it; nothing in the crate reads a global location on its own.
//!
//! ```text
//! ~/.strata/
//! ├── config.yml
//! ├── blocks/
//! ├── vars/
//! └── scaffolds/
//! ```
//!
//! `config.yml`:
//!
//! ```yaml
//! version: 1
//! paths:
//!   blocks: blocks
//!   vars: vars
//!   scaffolds: scaffolds
//! env:
//!   defaults: [base.env]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::parser::parse_config;
use crate::constants::{BLOCKS_DIR, SCAFFOLDS_DIR, USER_CONFIG_FILE, USER_ROOT_DIR, VARS_DIR};
use crate::core::StrataError;
use crate::env::EnvFiles;

/// `config.yml` as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawUserConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: Option<u32>,
    /// Directory names inside the user root
    #[serde(default)]
    pub paths: RawUserPaths,
    /// Lowest environment layer
    #[serde(default)]
    pub env: RawUserEnv,
}

/// `paths:` section of `config.yml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawUserPaths {
    #[serde(default)]
    pub blocks: Option<PathBuf>,
    #[serde(default)]
    pub vars: Option<PathBuf>,
    #[serde(default)]
    pub scaffolds: Option<PathBuf>,
}

/// `env:` section of `config.yml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawUserEnv {
    /// Env files relative to the vars directory
    #[serde(default)]
    pub defaults: Vec<String>,
}

/// Resolved user configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    /// The user root itself, also a template search root
    pub root: PathBuf,
    pub blocks_dir: PathBuf,
    pub vars_dir: PathBuf,
    pub scaffolds_dir: PathBuf,
    /// User env layer (lowest precedence); every listed file must exist
    pub default_env_files: EnvFiles,
}

impl UserConfig {
    /// Resolve the user root from an explicit value or the home directory.
    ///
    /// `explicit` may start with `~`, which is expanded.
    pub fn resolve_root(explicit: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(PathBuf::from(shellexpand::tilde(path).into_owned()));
        }
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(home.join(USER_ROOT_DIR))
    }

    /// Load the configuration of an installed user root.
    ///
    /// # Errors
    ///
    /// [`StrataError::UserRootNotFound`] if `root` does not exist, or a parse
    /// error for an invalid `config.yml`.
    pub fn load(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(StrataError::UserRootNotFound {
                path: root.display().to_string(),
            }
            .into());
        }

        let config_path = root.join(USER_CONFIG_FILE);
        let raw = if config_path.is_file() {
            parse_config::<RawUserConfig>(&config_path)?
        } else {
            RawUserConfig::default()
        };
        Ok(Self::from_raw(root, raw))
    }

    /// Resolve raw settings against `root`.
    #[must_use]
    pub fn from_raw(root: &Path, raw: RawUserConfig) -> Self {
        let dir = |configured: Option<PathBuf>, default: &str| {
            root.join(configured.unwrap_or_else(|| PathBuf::from(default)))
        };
        let vars_dir = dir(raw.paths.vars, VARS_DIR);
        let default_env_files =
            EnvFiles::required(raw.env.defaults.iter().map(|f| vars_dir.join(f)).collect());

        Self {
            root: root.to_path_buf(),
            blocks_dir: dir(raw.paths.blocks, BLOCKS_DIR),
            scaffolds_dir: dir(raw.paths.scaffolds, SCAFFOLDS_DIR),
            vars_dir,
            default_env_files,
        }
    }
}
