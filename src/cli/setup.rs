//! `strata setup` and `strata uninstall`: manage the user root.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

use super::CliConfig;
use crate::setup::{run_setup, run_uninstall};

#[derive(Args)]
pub struct SetupCommand {
    /// Overwrite library files that already exist
    #[arg(short, long)]
    force: bool,
}

impl SetupCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let root = config.resolve_user_root()?;
        let outcome = run_setup(&root, self.force)?;

        println!(
            "{} Template library installed in {} ({} written, {} kept)",
            "✓".green(),
            root.display(),
            outcome.installed.len(),
            outcome.skipped.len()
        );
        if !outcome.skipped.is_empty() && !self.force {
            println!("  Run {} to replace the kept files", "strata setup --force".cyan());
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct UninstallCommand {
    /// Remove without asking for confirmation
    #[arg(short, long)]
    yes: bool,
}

impl UninstallCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let root = config.resolve_user_root()?;
        if !root.exists() {
            println!("Nothing to remove at {}", root.display());
            return Ok(());
        }

        if !self.yes && !confirm(&format!("Remove {} and everything in it? [y/N]:", root.display()))? {
            println!("{}", "Uninstall cancelled.".yellow());
            return Ok(());
        }

        run_uninstall(&root)?;
        println!("{} Removed {}", "✓".green(), root.display());
        Ok(())
    }
}

/// Ask a yes/no question on stdin. Non-interactive stdin counts as "no".
fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        eprintln!("{}", "Not a terminal; pass --yes to uninstall non-interactively.".yellow());
        return Ok(false);
    }

    print!("{} ", question.yellow());
    io::stdout().flush()?;

    let mut response = String::new();
    stdin.lock().read_line(&mut response)?;
    Ok(matches!(response.trim().to_lowercase().as_str(), "y" | "yes"))
}
