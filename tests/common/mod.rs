//! Helpers shared by the integration tests.

use assert_cmd::Command;
use std::path::Path;

pub use strata_cli::test_utils::TestProject;

/// `strata` binary with `home` as the user root, default logging and no
/// terminal colors.
pub fn strata(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("strata").unwrap();
    cmd.env("STRATA_HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// `strata` running in the project root of `project`, with its user root.
pub fn strata_in(project: &TestProject) -> Command {
    let mut cmd = strata(project.user_root());
    cmd.current_dir(project.root());
    cmd
}
