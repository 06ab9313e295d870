//! `strata init`: create a new directory from a scaffold.
//!
//! Scaffolds live in the user library (`<user_root>/scaffolds/<name>`), so
//! `strata setup` has to run first.
//!
//! ```bash
//! strata init compose-stack shop              # ./shop
//! strata init compose-stack shop --path ~/src # ~/src/shop
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use crate::config::UserConfig;
use crate::scaffold::run_scaffold;

#[derive(Args)]
pub struct InitCommand {
    /// Scaffold to use
    scaffold: String,

    /// Name of the new directory, also available as `{{ name }}` in the scaffold
    name: String,

    /// Parent directory [default: current directory]
    #[arg(short, long)]
    path: Option<PathBuf>,
}

impl InitCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let user = UserConfig::load(&config.resolve_user_root()?)?;
        let parent = match self.path {
            Some(path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned()),
            None => std::env::current_dir()?,
        };

        let outcome = run_scaffold(&user.scaffolds_dir, &self.scaffold, &self.name, &parent)?;
        println!(
            "{} Created {} from '{}' ({} file(s))",
            "✓".green(),
            outcome.target.display(),
            self.scaffold,
            outcome.files.len()
        );
        for file in &outcome.files {
            println!("  {}", file.display());
        }
        Ok(())
    }
}
