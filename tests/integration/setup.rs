use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::strata;

#[test]
fn test_setup_installs_library() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");

    strata(&home)
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Template library installed"));

    assert!(home.join("config.yml").is_file());
    assert!(home.join("vars/base.env").is_file());
    assert!(home.join("blocks/postgres.yml.tpl").is_file());
    assert!(home.join("scaffolds/compose-stack/template").is_dir());
}

#[test]
fn test_setup_keeps_edits_unless_forced() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");
    strata(&home).arg("setup").assert().success();
    std::fs::write(home.join("vars/base.env"), "TZ=Europe/Berlin\n").unwrap();

    strata(&home)
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("strata setup --force"));
    assert_eq!(std::fs::read_to_string(home.join("vars/base.env")).unwrap(), "TZ=Europe/Berlin\n");

    strata(&home).args(["setup", "--force"]).assert().success();
    assert!(std::fs::read_to_string(home.join("vars/base.env")).unwrap().contains("TZ=UTC"));
}

#[test]
fn test_uninstall_with_yes() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");
    strata(&home).arg("setup").assert().success();

    strata(&home)
        .args(["uninstall", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    assert!(!home.exists());
}

#[test]
fn test_uninstall_without_terminal_needs_yes() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");
    strata(&home).arg("setup").assert().success();

    strata(&home)
        .arg("uninstall")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("cancelled"));

    assert!(home.exists());
}

#[test]
fn test_uninstall_missing_root() {
    let temp = TempDir::new().unwrap();

    strata(&temp.path().join("nothing"))
        .args(["uninstall", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to remove"));
}

#[test]
fn test_uninstall_refuses_filesystem_root() {
    let temp = TempDir::new().unwrap();

    strata(temp.path())
        .args(["--home", "/", "uninstall", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to delete critical directory"));
}
