use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::strata;

#[test]
fn test_setup_init_build_workflow() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");
    let work = temp.path().join("work");
    std::fs::create_dir_all(&work).unwrap();

    strata(&home).arg("setup").assert().success();

    strata(&home)
        .current_dir(&work)
        .args(["init", "compose-stack", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let project = work.join("shop");
    assert!(project.join("stack.yml.tpl").is_file());
    assert!(project.join("strata/blocks/app.yml.tpl").is_file());
    assert_eq!(
        std::fs::read_to_string(project.join("strata/vars/dev.env")).unwrap(),
        "POSTGRES_USER=shop\nPOSTGRES_PASSWORD=change-me\nPOSTGRES_DB=shop\n"
    );

    strata(&home).current_dir(&project).args(["build", "stack.yml.tpl"]).assert().success();

    let output = std::fs::read_to_string(project.join("stack.yml")).unwrap();
    assert!(output.starts_with("services:\n  app:\n    image: shop:latest\n    restart: unless-stopped\n"));
    assert!(output.contains("\n  postgres:\n    image: postgres:16\n"));
    assert!(output.contains("      TZ: UTC\n      POSTGRES_USER: shop\n"));
    assert!(output.ends_with("\nvolumes:\n  postgres-data: {}\n"));
}

#[test]
fn test_init_with_path() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");
    strata(&home).arg("setup").assert().success();

    strata(&home)
        .arg("init")
        .arg("compose-stack")
        .arg("api")
        .arg("--path")
        .arg(temp.path().join("elsewhere"))
        .assert()
        .success();

    assert!(temp.path().join("elsewhere/api/.strata.yml").is_file());
}

#[test]
fn test_init_refuses_existing_target() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");
    strata(&home).arg("setup").assert().success();
    std::fs::create_dir_all(temp.path().join("shop")).unwrap();
    std::fs::write(temp.path().join("shop/keep.txt"), "mine").unwrap();

    strata(&home)
        .current_dir(temp.path())
        .args(["init", "compose-stack", "shop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(std::fs::read_to_string(temp.path().join("shop/keep.txt")).unwrap(), "mine");
    assert!(!temp.path().join("shop/stack.yml.tpl").exists());
}

#[test]
fn test_init_unknown_scaffold() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join(".strata");
    strata(&home).arg("setup").assert().success();

    strata(&home)
        .current_dir(temp.path())
        .args(["init", "django", "shop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Scaffold 'django' not found"));
}
