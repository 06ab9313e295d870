//! Command-line interface for Strata.
//!
//! The CLI is a thin layer over the library: each subcommand parses its
//! arguments with `clap`, resolves the user root and calls into
//! [`crate::compose`], [`crate::scaffold`] or [`crate::setup`].
//!
//! # Commands
//!
//! - `build` - compose and render a stack template ([`build::BuildCommand`])
//! - `init` - create a project from a scaffold ([`init::InitCommand`])
//! - `setup` - install the template library ([`setup::SetupCommand`])
//! - `uninstall` - remove the template library ([`setup::UninstallCommand`])
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--home <dir>`: user root, also read from `STRATA_HOME`
//!
//! ```bash
//! strata setup
//! strata init compose-stack shop
//! strata build shop/stack.yml.tpl --profile prod
//! strata --home /tmp/strata-home build web.yml.tpl
//! ```

mod build;
mod init;
mod setup;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::UserConfig;
use crate::constants::HOME_ENV_VAR;

/// Settings derived from the global flags, applied once before a command runs.
///
/// Kept apart from [`Cli`] so tests can drive a command with a fixed
/// configuration instead of parsed arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter; `RUST_LOG` still takes precedence when set
    pub log_level: Option<String>,

    /// Explicit user root (`--home` or `STRATA_HOME`), `~` allowed
    pub user_root: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Safe to call more than once; later calls are ignored.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_deref().unwrap_or("warn")));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }

    /// Resolve the user root: the explicit value, else `~/.strata`.
    pub fn resolve_user_root(&self) -> Result<PathBuf> {
        UserConfig::resolve_root(self.user_root.as_deref())
    }
}

/// Strata - compose docker-compose stacks from reusable template blocks.
#[derive(Parser)]
#[command(
    name = "strata",
    about = "Compose docker-compose stacks from reusable template blocks",
    version,
    long_about = "Strata expands '# @include' directives in YAML templates into a single \
                  rendered file, using layered env files as the variable context."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output (include tree, located templates, env layers)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// User root holding blocks, vars and scaffolds [default: ~/.strata]
    #[arg(long, global = true, env = HOME_ENV_VAR, value_name = "DIR")]
    home: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose and render a stack template.
    ///
    /// Writes the rendered file next to the template (or to the configured
    /// output directory) with the `.tpl` suffix removed.
    Build(build::BuildCommand),

    /// Create a new directory from a scaffold in the user library.
    Init(init::InitCommand),

    /// Install the built-in template library into the user root.
    Setup(setup::SetupCommand),

    /// Remove the user root and everything in it.
    Uninstall(setup::UninstallCommand),
}

impl Cli {
    /// Execute the parsed command with a configuration built from the flags.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` maps to `debug`, `--quiet` to `error` and the default to
    /// `info`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            user_root: self.home.clone(),
        }
    }

    /// Execute the parsed command with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Build(cmd) => cmd.execute(&config),
            Commands::Init(cmd) => cmd.execute(&config),
            Commands::Setup(cmd) => cmd.execute(&config),
            Commands::Uninstall(cmd) => cmd.execute(&config),
        }
    }
}
