//! Project-level configuration (`.strata.yml`).
//!
//! A Strata project is any directory tree whose root holds a `strata/`
//! directory. That directory has a fixed layout:
//!
//! ```text
//! <project>/
//! ├── .strata.yml          optional, see below
//! └── strata/
//!     ├── blocks/          reusable blocks searched by `# @include`
//!     ├── vars/            environment files
//!     └── build/           scratch workspace, recreated on every build
//! ```
//!
//! `.strata.yml` only overrides what it names:
//!
//! ```yaml
//! version: 1
//! env:
//!   defaults: [base.env, docker.env]
//!   profiles:
//!     dev: [dev.env]
//!     prod: [prod.env, prod-secrets.env]
//! output:
//!   directory: deploy
//!   overwrite: false
//! defaults:
//!   profile: dev
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::parser::parse_config;
use crate::constants::{
    BLOCKS_DIR, BUILD_DIR, DEFAULT_ENV_FILES, DEFAULT_PROFILE, DEFAULT_PROFILES,
    PROJECT_CONFIG_FILE, PROJECT_MARKER_DIR, VARS_DIR,
};
use crate::core::StrataError;
use crate::env::EnvFiles;
use crate::utils::fs::find_project_root;

/// `.strata.yml` as written on disk. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawProjectConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: Option<u32>,
    /// Environment layering
    #[serde(default)]
    pub env: RawEnvConfig,
    /// Where and how output is written
    #[serde(default)]
    pub output: RawOutputConfig,
    /// Default selections
    #[serde(default)]
    pub defaults: RawDefaultsConfig,
}

/// `env:` section of `.strata.yml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEnvConfig {
    /// Project env files, relative to `strata/vars`
    #[serde(default)]
    pub defaults: Vec<String>,
    /// Profile name to env files, relative to `strata/vars`
    #[serde(default)]
    pub profiles: BTreeMap<String, Vec<String>>,
}

/// `output:` section of `.strata.yml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOutputConfig {
    /// Output directory relative to the project root
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Replace an existing output file
    #[serde(default)]
    pub overwrite: Option<bool>,
}

/// `defaults:` section of `.strata.yml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDefaultsConfig {
    /// Profile used when `--profile` is not given
    #[serde(default)]
    pub profile: Option<String>,
}

/// Fully resolved project configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Configuration format version
    pub version: u32,
    /// Directory containing `strata/`
    pub project_root: PathBuf,
    /// `<root>/strata`, also a template search root
    pub strata_dir: PathBuf,
    /// `<root>/strata/blocks`
    pub blocks_dir: PathBuf,
    /// `<root>/strata/vars`
    pub vars_dir: PathBuf,
    /// `<root>/strata/build`
    pub build_dir: PathBuf,
    /// Project env layer
    pub default_env_files: EnvFiles,
    /// Profile env layers
    pub profiles: BTreeMap<String, EnvFiles>,
    /// Output directory; `None` writes beside the stack file
    pub output_dir: Option<PathBuf>,
    /// Whether an existing output file may be replaced
    pub overwrite: bool,
    /// Profile used when none is requested
    pub default_profile: String,
}

impl ProjectConfig {
    /// Discover the project root from `start` and load its configuration.
    pub fn discover(start: &Path) -> Result<Self> {
        let project_root = find_project_root(start)?;
        Self::load(&project_root)
    }

    /// Load the configuration of a known project root.
    ///
    /// A missing `.strata.yml` yields the built-in defaults.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(PROJECT_CONFIG_FILE);
        let raw = if config_path.is_file() {
            tracing::debug!("Loading project config from {}", config_path.display());
            parse_config::<RawProjectConfig>(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", PROJECT_CONFIG_FILE);
            RawProjectConfig::default()
        };
        Ok(Self::from_raw(project_root, raw))
    }

    /// Resolve raw settings against `project_root`, filling in defaults.
    ///
    /// Env files listed in `.strata.yml` are required; the built-in fallbacks
    /// are optional.
    #[must_use]
    pub fn from_raw(project_root: &Path, raw: RawProjectConfig) -> Self {
        let strata_dir = project_root.join(PROJECT_MARKER_DIR);
        let vars_dir = strata_dir.join(VARS_DIR);
        let in_vars = |files: &[String]| -> Vec<PathBuf> {
            files.iter().map(|f| vars_dir.join(f)).collect()
        };

        let default_env_files = if raw.env.defaults.is_empty() {
            EnvFiles::optional(DEFAULT_ENV_FILES.iter().map(|f| vars_dir.join(f)).collect())
        } else {
            EnvFiles::required(in_vars(&raw.env.defaults))
        };

        let profiles = if raw.env.profiles.is_empty() {
            DEFAULT_PROFILES
                .iter()
                .map(|name| {
                    let files = EnvFiles::optional(vec![vars_dir.join(format!("{name}.env"))]);
                    ((*name).to_string(), files)
                })
                .collect()
        } else {
            raw.env
                .profiles
                .iter()
                .map(|(name, files)| (name.clone(), EnvFiles::required(in_vars(files))))
                .collect()
        };

        Self {
            version: raw.version.unwrap_or(1),
            project_root: project_root.to_path_buf(),
            blocks_dir: strata_dir.join(BLOCKS_DIR),
            build_dir: strata_dir.join(BUILD_DIR),
            strata_dir,
            vars_dir: vars_dir.clone(),
            default_env_files,
            profiles,
            output_dir: raw.output.directory.map(|dir| project_root.join(dir)),
            overwrite: raw.output.overwrite.unwrap_or(true),
            default_profile: raw.defaults.profile.unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
        }
    }

    /// Select a profile and return its name with its env files.
    ///
    /// An explicitly requested profile must be defined. The default profile
    /// may be undefined, in which case it contributes no files.
    pub fn select_profile(&self, requested: Option<&str>) -> Result<(String, EnvFiles)> {
        match requested {
            Some(name) => match self.profiles.get(name) {
                Some(files) => Ok((name.to_string(), files.clone())),
                None => Err(StrataError::ProfileNotFound {
                    name: name.to_string(),
                    available: self.profiles.keys().cloned().collect(),
                }
                .into()),
            },
            None => {
                let name = self.default_profile.clone();
                let files = self.profiles.get(&name).cloned().unwrap_or_default();
                if files.is_empty() {
                    tracing::debug!("Default profile '{}' has no env files", name);
                }
                Ok((name, files))
            }
        }
    }
}
