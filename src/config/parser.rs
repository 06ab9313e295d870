//! Generic configuration parsing utilities.
//!
//! Both configuration files Strata reads (`.strata.yml` and the user's
//! `config.yml`) are YAML documents deserialized into serde types. This module
//! owns the read-and-parse step so error reporting is uniform.
//!
//! Example error output:
//! ```text
//! error: Invalid configuration file /path/to/.strata.yml
//! details: unknown field `outptu`, expected one of `version`, `env`, `output`, `defaults`
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::StrataError;

/// Parse a YAML configuration file into the specified type.
///
/// An empty document (or one holding only comments) yields `T::default()`.
///
/// # Errors
///
/// - the file cannot be read
/// - the file is not valid YAML or does not match `T`
///   ([`StrataError::ConfigParseError`])
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content, path)
}

/// Parse YAML text; `origin` is only used in error messages.
pub fn parse_config_str<T>(content: &str, origin: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let to_error = |e: serde_yaml::Error| StrataError::ConfigParseError {
        file: origin.display().to_string(),
        reason: e.to_string(),
    };

    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(to_error)?;
    if value.is_null() {
        return Ok(T::default());
    }

    let config = serde_yaml::from_value(value).map_err(to_error)?;
    Ok(config)
}
