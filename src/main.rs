//! Strata CLI entry point
//!
//! Parses the command line, runs the command and turns any error into a
//! colored message with details and a suggestion:
//! - `build` - compose and render a stack template
//! - `init` - create a project from a scaffold
//! - `setup` - install the template library
//! - `uninstall` - remove the template library

use anyhow::Result;
use clap::Parser;
use strata_cli::cli;
use strata_cli::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
