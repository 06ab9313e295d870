//! Breadth-first crawl of the include graph.
//!
//! Starting from the entry template, every referenced template is located,
//! converted by an [`Emitter`] and written to the build workspace exactly
//! once. The discovered set is the only de-duplication: a name is marked when
//! it is first enqueued, so any number of includes of the same block produce
//! one converted file.

use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use super::directive::parse_template;
use super::emitter::Emitter;
use super::graph::IncludeGraph;
use super::locator::TemplateLocator;
use crate::constants::{TEMPLATE_EXTENSION, TEMPLATE_SUFFIX};
use crate::core::StrataError;
use crate::utils::fs::ensure_parent_dir;

/// Result of a successful crawl.
#[derive(Debug)]
pub struct ComposeReport {
    /// Template name of the entry (its file name without `.yml.tpl`)
    pub entry_name: String,
    /// Converted entry file inside the workspace
    pub entry_path: PathBuf,
    /// Converted template names in crawl order, entry first
    pub converted: Vec<String>,
    /// Include edges between the converted templates
    pub graph: IncludeGraph,
}

/// Template name of an entry file: `web.yml.tpl` → `web`, `web.tpl` → `web`.
///
/// # Errors
///
/// [`StrataError::InvalidStackPath`] if the file name lacks the `.tpl` suffix.
pub fn entry_name(entry: &Path) -> Result<String> {
    let file_name = entry.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let name = file_name
        .strip_suffix(TEMPLATE_EXTENSION)
        .or_else(|| file_name.strip_suffix(TEMPLATE_SUFFIX))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StrataError::InvalidStackPath {
            path: entry.display().to_string(),
            reason: format!("expected a file name ending in '{TEMPLATE_SUFFIX}'"),
        })?;
    Ok(name.to_string())
}

/// Convert `entry` and every template it transitively includes into
/// `workspace`.
///
/// The entry is read from the given path. Every other template is resolved
/// by name through `locator`. The workspace is expected to be empty; the
/// caller owns its lifecycle.
///
/// # Errors
///
/// - a referenced template cannot be located
/// - a directive cannot be parsed or emitted
/// - the include graph contains a cycle ([`StrataError::CircularInclude`])
/// - reading a source or writing a converted file fails
pub fn compose(
    entry: &Path,
    locator: &TemplateLocator,
    workspace: &Path,
    emitter: &impl Emitter,
) -> Result<ComposeReport> {
    let entry_name = entry_name(entry)?;
    let mut graph = IncludeGraph::new();
    graph.add_template(&entry_name);

    let mut discovered: HashSet<String> = HashSet::from([entry_name.clone()]);
    let mut queue: VecDeque<String> = VecDeque::from([entry_name.clone()]);
    let mut converted = Vec::new();

    while let Some(name) = queue.pop_front() {
        let source = if name == entry_name {
            entry.to_path_buf()
        } else {
            locator.locate(&name)?
        };

        let content = std::fs::read_to_string(&source)
            .with_context(|| format!("Failed to read template: {}", source.display()))?;
        let parsed = parse_template(&content, &name)?;

        for directive in parsed.includes() {
            graph.add_include(&name, &directive.name);
            if discovered.insert(directive.name.clone()) {
                queue.push_back(directive.name.clone());
            }
        }

        let target = workspace.join(emitter.file_name(&name));
        ensure_parent_dir(&target)?;
        std::fs::write(&target, emitter.emit(&parsed, &name)?)
            .with_context(|| format!("Failed to write converted template: {}", target.display()))?;

        tracing::debug!("Converted '{}' from {}", name, source.display());
        converted.push(name);
    }

    graph.detect_cycles()?;

    Ok(ComposeReport {
        entry_path: workspace.join(emitter.file_name(&entry_name)),
        entry_name,
        converted,
        graph,
    })
}
