//! Installation and removal of the user template library.
//!
//! The library shipped with Strata is compiled into the binary and written to
//! the user root by `strata setup`. Files that already exist are left alone
//! unless `force` is set, so local edits survive a re-run.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::StrataError;
use crate::utils::fs::{atomic_write, is_critical_dir, remove_dir_all};

/// Built-in library: path relative to the user root, file contents.
const LIBRARY: &[(&str, &str)] = &[
    ("config.yml", include_str!("../../templates/config.yml")),
    ("vars/base.env", include_str!("../../templates/vars/base.env")),
    ("blocks/postgres.yml.tpl", include_str!("../../templates/blocks/postgres.yml.tpl")),
    ("blocks/redis.yml.tpl", include_str!("../../templates/blocks/redis.yml.tpl")),
    ("blocks/nginx.yml.tpl", include_str!("../../templates/blocks/nginx.yml.tpl")),
    (
        "scaffolds/compose-stack/scaffold.yml",
        include_str!("../../templates/scaffolds/compose-stack/scaffold.yml"),
    ),
    (
        "scaffolds/compose-stack/template/.strata.yml",
        include_str!("../../templates/scaffolds/compose-stack/template/.strata.yml"),
    ),
    (
        "scaffolds/compose-stack/template/stack.yml.tpl.tpl",
        include_str!("../../templates/scaffolds/compose-stack/template/stack.yml.tpl.tpl"),
    ),
    (
        "scaffolds/compose-stack/template/strata/blocks/app.yml.tpl.tpl",
        include_str!("../../templates/scaffolds/compose-stack/template/strata/blocks/app.yml.tpl.tpl"),
    ),
    (
        "scaffolds/compose-stack/template/strata/vars/base.env.tpl",
        include_str!("../../templates/scaffolds/compose-stack/template/strata/vars/base.env.tpl"),
    ),
    (
        "scaffolds/compose-stack/template/strata/vars/dev.env.tpl",
        include_str!("../../templates/scaffolds/compose-stack/template/strata/vars/dev.env.tpl"),
    ),
];

/// Files written and kept by [`run_setup`], relative to the user root.
#[derive(Debug, Default)]
pub struct SetupOutcome {
    pub installed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Install the built-in library into `user_root`.
pub fn run_setup(user_root: &Path, force: bool) -> Result<SetupOutcome> {
    let mut outcome = SetupOutcome::default();

    for (relative, content) in LIBRARY {
        let path = user_root.join(relative);
        if path.exists() && !force {
            tracing::debug!("Keeping existing {}", path.display());
            outcome.skipped.push(PathBuf::from(relative));
            continue;
        }
        atomic_write(&path, content.as_bytes())
            .with_context(|| format!("Failed to install {}", path.display()))?;
        outcome.installed.push(PathBuf::from(relative));
    }

    tracing::info!(
        "Setup of {}: {} installed, {} kept",
        user_root.display(),
        outcome.installed.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

/// Delete the user root. Returns `false` if there was nothing to remove.
///
/// # Errors
///
/// [`StrataError::RefusedDangerousPath`] if `user_root` is the filesystem
/// root or the home directory.
pub fn run_uninstall(user_root: &Path) -> Result<bool> {
    if !user_root.exists() {
        return Ok(false);
    }
    if is_critical_dir(user_root) {
        return Err(StrataError::RefusedDangerousPath {
            path: user_root.display().to_string(),
        }
        .into());
    }

    remove_dir_all(user_root)?;
    tracing::info!("Removed {}", user_root.display());
    Ok(true)
}
