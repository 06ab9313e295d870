//! Stack composition: from a stack template to one rendered document.
//!
//! A build runs these steps, aborting on the first error:
//!
//! 1. validate the stack path (`*.tpl`, must exist)
//! 2. discover the project root and load `.strata.yml`
//! 3. load the user configuration from the user root
//! 4. select the profile and merge the env layers into the render context
//! 5. recreate `strata/build/` and crawl the include graph into it
//! 6. render the converted entry with Tera
//! 7. write the output atomically, beside the stack or in `output.directory`
//!
//! The output file is only touched after a successful render. The workspace
//! may hold partially converted files after a failure; the next build deletes
//! it first.
//!
//! # Concurrency
//!
//! Builds are synchronous and single-threaded. Two builds in the same project
//! share `strata/build/` and must not run at the same time; callers that
//! might start concurrent builds have to serialize them.
//!
//! # Modules
//!
//! - [`locator`] - resolve template names across search roots
//! - [`directive`] - parse include directives and variable blocks
//! - [`emitter`] - write the parsed form as Tera syntax
//! - [`graph`] - include graph and cycle detection
//! - [`crawler`] - breadth-first conversion into the workspace

pub mod crawler;
pub mod directive;
pub mod emitter;
pub mod graph;
pub mod locator;

pub use crawler::{ComposeReport, compose};
pub use directive::{IncludeDirective, ParsedTemplate, Segment, VarValue, VariableBlock};
pub use emitter::{Emitter, TeraEmitter};
pub use graph::IncludeGraph;
pub use locator::{SearchRoot, TemplateLocator};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{ProjectConfig, UserConfig};
use crate::constants::TEMPLATE_SUFFIX;
use crate::core::StrataError;
use crate::env::resolve_env_layers;
use crate::templating::StackRenderer;
use crate::utils::fs::{reset_dir, safe_write};

/// Inputs of one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Stack template to build
    pub stack: PathBuf,
    /// Profile to apply; `None` uses the project default
    pub profile: Option<String>,
    /// User root holding the shared template library
    pub user_root: PathBuf,
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Rendered file
    pub output_path: PathBuf,
    /// Profile that was applied
    pub profile: String,
    /// Templates converted, entry first
    pub converted: Vec<String>,
    /// Distinct include edges between the converted templates
    pub includes: usize,
    /// Number of variables in the render context
    pub variables: usize,
}

/// Output path for `stack`: its file name minus `.tpl`, in `output_dir` when
/// given, else beside the stack.
///
/// # Errors
///
/// [`StrataError::InvalidStackPath`] if the file name does not end in `.tpl`.
pub fn output_path_for(stack: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let file_name = stack
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(TEMPLATE_SUFFIX))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StrataError::InvalidStackPath {
            path: stack.display().to_string(),
            reason: format!("expected a file name ending in '{TEMPLATE_SUFFIX}'"),
        })?;

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => stack.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(file_name))
}

/// Build one stack template.
///
/// Not safe to run concurrently with another build of the same project; see
/// the module documentation.
///
/// # Errors
///
/// Any configuration, env, composition or render error aborts the build. The
/// output file is left untouched in that case.
pub fn build_stack(options: &BuildOptions) -> Result<BuildOutcome> {
    output_path_for(&options.stack, None)?;
    if !options.stack.is_file() {
        return Err(StrataError::StackNotFound {
            path: options.stack.display().to_string(),
        }
        .into());
    }
    let stack = options
        .stack
        .canonicalize()
        .with_context(|| format!("Failed to resolve stack path: {}", options.stack.display()))?;
    let stack_dir = stack.parent().map(Path::to_path_buf).unwrap_or_default();

    let project = ProjectConfig::discover(&stack_dir)?;
    let user = UserConfig::load(&options.user_root)?;
    tracing::info!("Project root: {}", project.project_root.display());

    let output_path = output_path_for(&stack, project.output_dir.as_deref())?;
    if output_path.exists() && !project.overwrite {
        return Err(StrataError::OutputExists {
            path: output_path.display().to_string(),
        }
        .into());
    }

    let (profile, profile_files) = project.select_profile(options.profile.as_deref())?;
    let env = resolve_env_layers(&user.default_env_files, &project.default_env_files, &profile_files)?;
    tracing::info!("Profile '{}': {} variable(s)", profile, env.len());

    reset_dir(&project.build_dir)?;
    let locator = TemplateLocator::new([
        SearchRoot::new(stack_dir),
        SearchRoot::new(project.strata_dir.clone()),
        SearchRoot::with_blocks_dir(user.root.clone(), user.blocks_dir.clone()),
    ]);
    let report = compose(&stack, &locator, &project.build_dir, &TeraEmitter::new())
        .with_context(|| format!("Failed to compose {}", stack.display()))?;
    tracing::info!(
        "Converted {} template(s) with {} include(s)",
        report.graph.template_count(),
        report.graph.include_count()
    );
    tracing::debug!("Include tree:\n{}", report.graph.to_tree_string(&report.entry_name));

    let includes = report.graph.include_count();
    let renderer = StackRenderer::from_workspace(&project.build_dir)?;
    let entry = TeraEmitter::new().file_name(&report.entry_name);
    let rendered = renderer.render(&entry, &env)?;

    safe_write(&output_path, &rendered)?;
    tracing::info!("Wrote {}", output_path.display());

    Ok(BuildOutcome {
        output_path,
        profile,
        converted: report.converted,
        includes,
        variables: env.len(),
    })
}
