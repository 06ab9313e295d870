//! Error handling for Strata
//!
//! This module provides the error types and user-friendly error reporting for the
//! Strata stack composer. As in the rest of the crate, errors follow two rules:
//! 1. **Strongly-typed errors** ([`StrataError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Not found**: [`StrataError::TemplateNotFound`], [`StrataError::ProjectRootNotFound`],
//!   [`StrataError::UserRootNotFound`], [`StrataError::ScaffoldNotFound`],
//!   [`StrataError::ProfileNotFound`], [`StrataError::StackNotFound`],
//!   [`StrataError::EnvFileNotFound`]
//! - **Malformed input**: [`StrataError::MalformedEnvLine`], [`StrataError::ConfigParseError`],
//!   [`StrataError::InvalidDirective`], [`StrataError::InvalidStackPath`]
//! - **Undefined reference**: [`StrataError::UndefinedVariable`]
//! - **Conflict**: [`StrataError::OutputExists`], [`StrataError::TargetExists`]
//! - **Graph**: [`StrataError::CircularInclude`]
//!
//! Every operation in the crate returns `anyhow::Result`; domain errors are raised as
//! [`StrataError`] values and recovered with [`user_friendly_error`] at the CLI boundary.
//!
//! # Examples
//!
//! ```rust,no_run
//! use strata_cli::core::{StrataError, user_friendly_error};
//!
//! let error = StrataError::TemplateNotFound {
//!     name: "postgres".to_string(),
//!     searched: vec![],
//!     suggestion: Some("postgres16".to_string()),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Strata operations
///
/// Each variant maps to one failure mode of a build, a scaffold or the setup
/// commands. All of them abort the running command; there is no partial success.
#[derive(Error, Debug, Clone)]
pub enum StrataError {
    /// A template name could not be resolved against any search root
    #[error("Template '{name}' not found in any search root")]
    TemplateNotFound {
        /// Bare template name as written in the include directive
        name: String,
        /// Every candidate path that was checked, in search order
        searched: Vec<PathBuf>,
        /// Closest existing template name, if any is reasonably similar
        suggestion: Option<String>,
    },

    /// The stack file passed to `build` does not exist
    #[error("Stack file not found: {path}")]
    StackNotFound {
        /// Path given on the command line
        path: String,
    },

    /// The stack file does not carry the template suffix
    #[error("Invalid stack path '{path}': {reason}")]
    InvalidStackPath {
        /// Path given on the command line
        path: String,
        /// Why the path was rejected
        reason: String,
    },

    /// No directory containing `strata/` was found walking upward
    ///
    /// Strata searches the starting directory and every parent up to the
    /// filesystem root, similar to how git searches for `.git`.
    #[error("Could not discover project root from {start} (no strata/ directory found)")]
    ProjectRootNotFound {
        /// Directory the search started from
        start: String,
    },

    /// The user template library has not been installed
    #[error("Strata user directory not found: {path}")]
    UserRootNotFound {
        /// Expected location of the user root
        path: String,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration file {file}")]
    ConfigParseError {
        /// Path to the configuration file
        file: String,
        /// Parser message
        reason: String,
    },

    /// Profile requested on the command line is not defined
    #[error("Unknown profile '{name}'")]
    ProfileNotFound {
        /// Requested profile
        name: String,
        /// Profiles defined by the project configuration
        available: Vec<String>,
    },

    /// An environment file line without a `=` separator
    #[error("Malformed line {line_number} in {file}: expected KEY=VALUE")]
    MalformedEnvLine {
        /// Environment file being parsed
        file: String,
        /// 1-based line number
        line_number: usize,
        /// Offending line content
        line: String,
    },

    /// An env file named in a configuration file does not exist
    #[error("Env file not found: {file} ({layer} layer)")]
    EnvFileNotFound {
        /// Missing file
        file: String,
        /// Layer that lists it: `default`, `project` or `profile`
        layer: String,
    },

    /// An include directive or its variable block cannot be converted
    #[error("Invalid include directive in template '{template}' at line {line_number}: {reason}")]
    InvalidDirective {
        /// Template containing the directive
        template: String,
        /// 1-based line number of the include directive
        line_number: usize,
        /// What is wrong with the directive
        reason: String,
    },

    /// The include graph contains a cycle
    #[error("Circular include detected: {chain}")]
    CircularInclude {
        /// Cycle rendered as `a → b → a`
        chain: String,
    },

    /// A variable referenced during rendering has no binding
    #[error("Undefined variable '{variable}' in template '{template}'")]
    UndefinedVariable {
        /// Variable name reported by the template engine
        variable: String,
        /// Converted template that referenced it
        template: String,
        /// Similar names present in the render context
        suggestions: Vec<String>,
    },

    /// Rendering failed for another reason (syntax, filter errors)
    #[error("Failed to render template '{template}': {message}")]
    RenderFailed {
        /// Converted template being rendered
        template: String,
        /// Cleaned-up engine message
        message: String,
    },

    /// The output file exists and overwriting is disabled
    #[error("Output file already exists: {path}")]
    OutputExists {
        /// Output path
        path: String,
    },

    /// A scaffold target directory already exists
    #[error("Target '{path}' already exists")]
    TargetExists {
        /// Target directory
        path: String,
    },

    /// The named scaffold is not installed
    #[error("Scaffold '{name}' not found in {root}")]
    ScaffoldNotFound {
        /// Scaffold name
        name: String,
        /// Directory searched for scaffolds
        root: String,
    },

    /// Refusing to run a destructive operation on a critical directory
    #[error("Refusing to delete critical directory: {path}")]
    RefusedDangerousPath {
        /// Path that was refused
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying Strata error
    pub error: StrataError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`StrataError`]
    #[must_use]
    pub const fn new(error: StrataError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes, in order:
/// - [`StrataError`] anywhere in the error chain, with tailored suggestions
/// - [`std::io::Error`] with filesystem-specific guidance
/// - Generic errors, reported with their full cause chain
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // Domain errors may sit below `.with_context` breadcrumbs
    if let Some(strata_error) = error.chain().find_map(|e| e.downcast_ref::<StrataError>()) {
        let mut ctx = create_error_context(strata_error);
        let outer: Vec<String> = error
            .chain()
            .take_while(|e| e.downcast_ref::<StrataError>().is_none())
            .map(std::string::ToString::to_string)
            .collect();
        if !outer.is_empty() && ctx.details.is_none() {
            ctx.details = Some(outer.join(": "));
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(StrataError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the project and user directories")
                .with_details("This error occurs when Strata doesn't have permission to read or write files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(StrataError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(StrataError::Other {
        message,
    })
}

/// Map each [`StrataError`] variant to an [`ErrorContext`] with suggestions
fn create_error_context(error: &StrataError) -> ErrorContext {
    match error {
        StrataError::TemplateNotFound { name, searched, suggestion } => {
            let searched_list = searched
                .iter()
                .map(|p| format!("  - {}", p.display()))
                .collect::<Vec<_>>()
                .join("\n");
            let ctx = ErrorContext::new(error.clone())
                .with_details(format!("Searched:\n{searched_list}"));
            match suggestion {
                Some(similar) => ctx.with_suggestion(format!(
                    "Did you mean '{similar}'? Check the name in '# @include {name}'"
                )),
                None => ctx.with_suggestion(format!(
                    "Create {name}.yml.tpl in strata/blocks/ or install it in your user library"
                )),
            }
        }

        StrataError::ProjectRootNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Create a strata/ directory at the root of your project")
            .with_details("Strata looks for a strata/ directory in the current directory and its parents up to the filesystem root"),

        StrataError::UserRootNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Run 'strata setup' first, or point --home / STRATA_HOME at an existing library"),

        StrataError::ConfigParseError { file, reason } => ErrorContext::new(error.clone())
            .with_details(reason.clone())
            .with_suggestion(format!("Check the YAML syntax and key names in {file}")),

        StrataError::ProfileNotFound { available, .. } => {
            let known = if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            };
            ErrorContext::new(error.clone())
                .with_details(format!("Known profiles: {known}"))
                .with_suggestion("Define the profile under env.profiles in .strata.yml or pick a known one")
        }

        StrataError::MalformedEnvLine { line, .. } => ErrorContext::new(error.clone())
            .with_details(format!("Offending line: {line}"))
            .with_suggestion("Every non-comment line must look like KEY=VALUE; comment lines start with '#'"),

        StrataError::EnvFileNotFound { layer, .. } => {
            let source = if layer == "default" {
                "config.yml in the user root"
            } else {
                ".strata.yml"
            };
            ErrorContext::new(error.clone())
                .with_suggestion(format!("Create the file or remove it from the env section of {source}"))
        }

        StrataError::CircularInclude { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Remove one of the '# @include' directives that closes the cycle"),

        StrataError::UndefinedVariable { variable, suggestions, .. } => {
            let ctx = ErrorContext::new(error.clone());
            if suggestions.is_empty() {
                ctx.with_suggestion(format!(
                    "Define {variable} in an env file or pass it through a '# @vars' block"
                ))
            } else {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }

        StrataError::OutputExists { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Remove the file or set output.overwrite: true in .strata.yml"),

        StrataError::TargetExists { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Choose another name or remove the existing directory"),

        StrataError::ScaffoldNotFound { root, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("List available scaffolds in {root}")),

        _ => ErrorContext::new(error.clone()),
    }
}
