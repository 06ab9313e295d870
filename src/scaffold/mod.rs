//! Project scaffolding (`strata init`).
//!
//! A scaffold is a directory in the user library:
//!
//! ```text
//! <user_root>/scaffolds/<scaffold>/
//! ├── scaffold.yml        optional metadata
//! └── template/           tree copied into the new directory
//!     ├── {{ name }}/
//!     │   └── app.yml.tpl
//!     └── README.md.tpl
//! ```
//!
//! `{{ name }}` in any path component is replaced with the target name.
//! Files ending in `.tpl` are rendered with Tera (context: `name`) and written
//! without the suffix; everything else is copied byte for byte.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::parse_config;
use crate::constants::TEMPLATE_SUFFIX;
use crate::core::StrataError;
use crate::templating::renderer::format_tera_error;
use crate::utils::fs::{ensure_dir, ensure_parent_dir};

const SCAFFOLD_META_FILE: &str = "scaffold.yml";
const SCAFFOLD_TEMPLATE_DIR: &str = "template";
const NAME_PLACEHOLDER: &str = "{{ name }}";

/// Optional `scaffold.yml`
#[derive(Debug, Default, Deserialize)]
pub struct ScaffoldMeta {
    #[serde(default)]
    pub description: Option<String>,
}

/// Summary of a created scaffold.
#[derive(Debug)]
pub struct ScaffoldOutcome {
    /// Directory that was created
    pub target: PathBuf,
    /// Files written, relative to `target`
    pub files: Vec<PathBuf>,
}

/// Create `<parent>/<name>` from the scaffold `scaffold` in `scaffolds_dir`.
///
/// # Errors
///
/// - [`StrataError::ScaffoldNotFound`] if the scaffold does not exist
/// - the scaffold has no `template/` directory
/// - [`StrataError::TargetExists`] if the target directory exists
/// - a `.tpl` file fails to render ([`StrataError::RenderFailed`])
pub fn run_scaffold(
    scaffolds_dir: &Path,
    scaffold: &str,
    name: &str,
    parent: &Path,
) -> Result<ScaffoldOutcome> {
    let scaffold_dir = scaffolds_dir.join(scaffold);
    if !scaffold_dir.is_dir() {
        return Err(StrataError::ScaffoldNotFound {
            name: scaffold.to_string(),
            root: scaffolds_dir.display().to_string(),
        }
        .into());
    }

    let meta_path = scaffold_dir.join(SCAFFOLD_META_FILE);
    if meta_path.is_file() {
        let meta: ScaffoldMeta = parse_config(&meta_path)?;
        if let Some(description) = meta.description {
            tracing::debug!("Scaffold '{}': {}", scaffold, description);
        }
    }

    let template_root = scaffold_dir.join(SCAFFOLD_TEMPLATE_DIR);
    if !template_root.is_dir() {
        bail!("Scaffold '{scaffold}' is missing a {SCAFFOLD_TEMPLATE_DIR}/ directory");
    }

    let target = parent.join(name);
    if target.exists() {
        return Err(StrataError::TargetExists {
            path: target.display().to_string(),
        }
        .into());
    }

    let mut context = tera::Context::new();
    context.insert("name", name);

    let files = copy_tree(&template_root, &target, name, &context)?;
    tracing::info!("Created {} from scaffold '{}' ({} files)", target.display(), scaffold, files.len());

    Ok(ScaffoldOutcome {
        target,
        files,
    })
}

fn copy_tree(
    template_root: &Path,
    target: &Path,
    name: &str,
    context: &tera::Context,
) -> Result<Vec<PathBuf>> {
    ensure_dir(target)?;
    let mut written = Vec::new();

    for entry in WalkDir::new(template_root).min_depth(1).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to read scaffold: {}", template_root.display()))?;
        let relative = entry.path().strip_prefix(template_root).unwrap_or(entry.path());
        let mut destination: PathBuf = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy().replace(NAME_PLACEHOLDER, name))
            .collect();

        if entry.file_type().is_dir() {
            ensure_dir(&target.join(&destination))?;
            continue;
        }

        let file_name = destination.file_name().map(|n| n.to_string_lossy().into_owned());
        match file_name.as_deref().and_then(|n| n.strip_suffix(TEMPLATE_SUFFIX)) {
            Some(rendered_name) if !rendered_name.is_empty() => {
                destination.set_file_name(rendered_name);
                let path = target.join(&destination);
                ensure_parent_dir(&path)?;
                std::fs::write(&path, render_file(entry.path(), context)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            _ => {
                let path = target.join(&destination);
                ensure_parent_dir(&path)?;
                std::fs::copy(entry.path(), &path).with_context(|| {
                    format!("Failed to copy {} to {}", entry.path().display(), path.display())
                })?;
            }
        }
        written.push(destination);
    }

    Ok(written)
}

fn render_file(path: &Path, context: &tera::Context) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scaffold template: {}", path.display()))?;
    let rendered = tera::Tera::one_off(&source, context, false).map_err(|e| StrataError::RenderFailed {
        template: path.display().to_string(),
        message: format_tera_error(&e),
    })?;
    Ok(rendered)
}
