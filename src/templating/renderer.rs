//! Final rendering pass with Tera.
//!
//! The renderer loads every converted template in the build workspace under
//! its workspace-relative name, so `{% include "db/replica.yml.tpl" %}`
//! resolves against the workspace only. Undefined variables are errors; Tera
//! never substitutes an empty value.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};
use walkdir::WalkDir;

use super::filters;
use crate::constants::REINDENT_FILTER;
use crate::core::StrataError;
use crate::env::EnvMap;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

static UNDEFINED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Variable `(?P<name>[^`]+)` not found in context while rendering '(?P<template>[^']+)'")
        .expect("undefined variable pattern is valid")
});

/// Tera instance loaded with a build workspace.
pub struct StackRenderer {
    tera: Tera,
}

impl StackRenderer {
    /// Load every file below `workspace` as a template.
    ///
    /// # Errors
    ///
    /// - the workspace cannot be walked or a file cannot be read
    /// - a converted template does not parse ([`StrataError::RenderFailed`])
    pub fn from_workspace(workspace: &Path) -> Result<Self> {
        let mut templates = Vec::new();
        for entry in WalkDir::new(workspace).min_depth(1).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to read build workspace: {}", workspace.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry
                .path()
                .strip_prefix(workspace)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            let content = std::fs::read_to_string(entry.path())
                .with_context(|| format!("Failed to read converted template: {}", entry.path().display()))?;
            templates.push((name, content));
        }
        tracing::debug!("Loaded {} converted template(s) from {}", templates.len(), workspace.display());

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter(REINDENT_FILTER, filters::create_reindent_filter());
        tera.add_raw_templates(templates).map_err(|e| StrataError::RenderFailed {
            template: workspace.display().to_string(),
            message: format_tera_error(&e),
        })?;

        Ok(Self {
            tera,
        })
    }

    /// Render `template` (a workspace-relative name) with `env` as context.
    ///
    /// # Errors
    ///
    /// [`StrataError::UndefinedVariable`] for a missing variable, with
    /// similarly named context keys as suggestions, or
    /// [`StrataError::RenderFailed`] for any other engine failure.
    pub fn render(&self, template: &str, env: &EnvMap) -> Result<String> {
        let mut context = TeraContext::new();
        for (key, value) in env {
            context.insert(key.as_str(), value);
        }

        self.tera.render(template, &context).map_err(|e| Self::map_tera_error(&e, template, env).into())
    }

    fn map_tera_error(error: &tera::Error, template: &str, env: &EnvMap) -> StrataError {
        let message = format_tera_error(error);
        if let Some(caps) = UNDEFINED_RE.captures(&message) {
            let variable = caps["name"].to_string();
            let suggestions = find_similar_variables(&variable, env.keys());
            return StrataError::UndefinedVariable {
                variable,
                template: caps["template"].to_string(),
                suggestions,
            };
        }

        StrataError::RenderFailed {
            template: template.to_string(),
            message,
        }
    }
}

/// Closest context keys to `target`, best first, at most three.
fn find_similar_variables<'a>(target: &str, available: impl Iterator<Item = &'a String>) -> Vec<String> {
    let limit = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
    let mut scored: Vec<_> = available
        .map(|var| (levenshtein(target, var), var.clone()))
        .filter(|(distance, _)| *distance <= limit)
        .collect();
    scored.sort();
    scored.into_iter().take(3).map(|(_, var)| var).collect()
}

/// Flatten a Tera error and its sources into one message.
#[must_use]
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }
    messages.retain(|m| !m.trim().is_empty());
    messages.join(": ")
}
