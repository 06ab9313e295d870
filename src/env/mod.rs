//! Environment layer resolution.
//!
//! An environment file is a newline-delimited list of `KEY=VALUE` pairs.
//! Blank lines and lines starting with `#` are ignored, keys and values are
//! trimmed and the value is everything after the first `=`:
//!
//! ```text
//! # database
//! POSTGRES_USER=app
//! DATABASE_URL=postgres://app@db/app?sslmode=disable
//! ```
//!
//! Layers merge in a fixed order (user defaults, project defaults, selected
//! profile) and a later layer overrides an earlier one key by key. The merged
//! map is the render context handed to the template engine.
//!
//! Files named in `config.yml` or `.strata.yml` must exist. Only the built-in
//! fallbacks (`base.env`, `docker.env`, `<profile>.env`) are optional.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::StrataError;

/// Flat key/value map produced by merging environment layers.
pub type EnvMap = BTreeMap<String, String>;

/// The env files of one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFiles {
    pub paths: Vec<PathBuf>,
    /// Listed in a configuration file; a missing file fails the build
    pub required: bool,
}

impl EnvFiles {
    /// Files named by configuration.
    #[must_use]
    pub fn required(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            required: true,
        }
    }

    /// Built-in fallbacks, skipped when absent.
    #[must_use]
    pub fn optional(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            required: false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Parse the contents of one environment file.
///
/// `origin` names the file in error messages.
///
/// # Errors
///
/// [`StrataError::MalformedEnvLine`] for the first line without `=`.
pub fn parse_env_str(content: &str, origin: &Path) -> Result<EnvMap> {
    let mut values = EnvMap::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(StrataError::MalformedEnvLine {
                file: origin.display().to_string(),
                line_number: index + 1,
                line: line.to_string(),
            }
            .into());
        };
        values.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(values)
}

/// Read and parse one environment file.
pub fn parse_env_file(path: &Path) -> Result<EnvMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;
    parse_env_str(&content, path)
}

/// Merge env files into `target`, in order.
fn merge_layer(target: &mut EnvMap, layer: &str, files: &EnvFiles) -> Result<()> {
    for file in &files.paths {
        if !file.is_file() {
            if files.required {
                return Err(StrataError::EnvFileNotFound {
                    file: file.display().to_string(),
                    layer: layer.to_string(),
                }
                .into());
            }
            tracing::debug!("No {} env file at {}", layer, file.display());
            continue;
        }
        let values = parse_env_file(file)?;
        tracing::debug!("Loaded {} value(s) from {} ({})", values.len(), file.display(), layer);
        target.extend(values);
    }
    Ok(())
}

/// Resolve the render context from the three environment layers.
///
/// Precedence, lowest first: `defaults`, `project`, `profile`.
///
/// # Errors
///
/// [`StrataError::EnvFileNotFound`] when a required file is missing, or a
/// parse error for a malformed file.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use strata_cli::env::{EnvFiles, resolve_env_layers};
///
/// # fn example() -> anyhow::Result<()> {
/// let merged = resolve_env_layers(
///     &EnvFiles::required(vec![PathBuf::from("/home/me/.strata/vars/base.env")]),
///     &EnvFiles::optional(vec![PathBuf::from("strata/vars/base.env")]),
///     &EnvFiles::required(vec![PathBuf::from("strata/vars/prod.env")]),
/// )?;
/// println!("{} variables", merged.len());
/// # Ok(())
/// # }
/// ```
pub fn resolve_env_layers(defaults: &EnvFiles, project: &EnvFiles, profile: &EnvFiles) -> Result<EnvMap> {
    let mut merged = EnvMap::new();
    merge_layer(&mut merged, "default", defaults)?;
    merge_layer(&mut merged, "project", project)?;
    merge_layer(&mut merged, "profile", profile)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn map(pairs: &[(&str, &str)]) -> EnvMap {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let values = parse_env_str(
            "# comment\n\n  APP = web \nURL=postgres://u@h/db?x=1\n   # indented comment\n",
            Path::new("base.env"),
        )
        .unwrap();
        assert_eq!(values, map(&[("APP", "web"), ("URL", "postgres://u@h/db?x=1")]));
    }

    #[test]
    fn test_later_duplicate_in_file_wins() {
        let values = parse_env_str("A=1\nA=2\n", Path::new("x.env")).unwrap();
        assert_eq!(values["A"], "2");
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let values = parse_env_str("EMPTY=\n", Path::new("x.env")).unwrap();
        assert_eq!(values["EMPTY"], "");
    }

    #[test]
    fn test_line_without_separator_fails() {
        let err = parse_env_str("A=1\n\nBROKEN\n", Path::new("prod.env")).unwrap_err();
        match err.downcast_ref::<StrataError>() {
            Some(StrataError::MalformedEnvLine {
                file,
                line_number,
                line,
            }) => {
                assert_eq!(file, "prod.env");
                assert_eq!(*line_number, 3);
                assert_eq!(line, "BROKEN");
            }
            other => panic!("Expected MalformedEnvLine, got {other:?}"),
        }
    }

    #[test]
    fn test_layer_precedence() {
        let temp = tempdir().unwrap();
        let defaults = temp.path().join("defaults.env");
        let project = temp.path().join("project.env");
        let profile = temp.path().join("profile.env");
        std::fs::write(&defaults, "A=1\nB=1\n").unwrap();
        std::fs::write(&project, "B=2\nC=2\n").unwrap();
        std::fs::write(&profile, "C=3\n").unwrap();

        let merged = resolve_env_layers(
            &EnvFiles::required(vec![defaults]),
            &EnvFiles::required(vec![project]),
            &EnvFiles::required(vec![profile]),
        )
        .unwrap();
        assert_eq!(merged, map(&[("A", "1"), ("B", "2"), ("C", "3")]));
    }

    #[test]
    fn test_files_within_a_layer_merge_in_order() {
        let temp = tempdir().unwrap();
        let first = temp.path().join("base.env");
        let second = temp.path().join("docker.env");
        std::fs::write(&first, "IMAGE=app:1\n").unwrap();
        std::fs::write(&second, "IMAGE=app:2\n").unwrap();

        let merged = resolve_env_layers(
            &EnvFiles::default(),
            &EnvFiles::required(vec![first, second]),
            &EnvFiles::default(),
        )
        .unwrap();
        assert_eq!(merged["IMAGE"], "app:2");
    }

    #[test]
    fn test_missing_optional_files_are_skipped() {
        let temp = tempdir().unwrap();
        let present = temp.path().join("base.env");
        std::fs::write(&present, "A=1\n").unwrap();

        let merged = resolve_env_layers(
            &EnvFiles::default(),
            &EnvFiles::optional(vec![present, temp.path().join("docker.env")]),
            &EnvFiles::optional(vec![temp.path().join("dev.env")]),
        )
        .unwrap();
        assert_eq!(merged, map(&[("A", "1")]));
    }

    #[test]
    fn test_missing_required_file_fails() {
        let temp = tempdir().unwrap();
        let present = temp.path().join("base.env");
        std::fs::write(&present, "A=1\n").unwrap();
        let typo = temp.path().join("bsae.env");

        let err = resolve_env_layers(
            &EnvFiles::default(),
            &EnvFiles::required(vec![present, typo.clone()]),
            &EnvFiles::default(),
        )
        .unwrap_err();
        match err.downcast_ref::<StrataError>() {
            Some(StrataError::EnvFileNotFound {
                file,
                layer,
            }) => {
                assert_eq!(file, &typo.display().to_string());
                assert_eq!(layer, "project");
            }
            other => panic!("Expected EnvFileNotFound, got {other:?}"),
        }
    }
}
