//! `strata build`: compose and render one stack template.
//!
//! ```bash
//! strata build web.yml.tpl                 # writes web.yml
//! strata build stacks/api.yml.tpl -p prod  # prod.env as the top layer
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use crate::compose::{BuildOptions, build_stack};

#[derive(Args)]
pub struct BuildCommand {
    /// Stack template to build (must end in `.tpl`)
    template: PathBuf,

    /// Profile whose env file is layered last [default: from .strata.yml]
    #[arg(short, long)]
    profile: Option<String>,
}

impl BuildCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let options = BuildOptions {
            stack: self.template,
            profile: self.profile,
            user_root: config.resolve_user_root()?,
        };

        let outcome = build_stack(&options)?;
        println!(
            "{} Built {} (profile '{}', {} template(s))",
            "✓".green(),
            outcome.output_path.display(),
            outcome.profile,
            outcome.converted.len()
        );
        Ok(())
    }
}
