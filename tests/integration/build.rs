use predicates::prelude::*;

use crate::common::{TestProject, strata_in};

#[test]
fn test_build_inlines_block_at_directive_indent() {
    let project = TestProject::new();
    project.write_block("db", "db:\n  image: postgres\n");
    project.write_stack("web", "services:\n  # @include db\nvolumes: {}\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web.yml"));

    assert_eq!(project.read("web.yml"), "services:\n  db:\n    image: postgres\nvolumes: {}\n");
}

#[test]
fn test_nested_includes_accumulate_indentation() {
    let project = TestProject::new();
    project.write_block("db", "db:\n  environment:\n    # @include db-env\n");
    project.write_block("db-env", "PGDATA: /data\n");
    project.write_stack("web", "services:\n  # @include db\n");

    strata_in(&project).args(["build", "web.yml.tpl"]).assert().success();

    assert_eq!(
        project.read("web.yml"),
        "services:\n  db:\n    environment:\n      PGDATA: /data\n"
    );
}

#[test]
fn test_list_variable_is_bound_for_one_include() {
    let project = TestProject::new();
    project.write_block(
        "proxy",
        "{{ name }}:\n  ports:\n{% for port in ports %}    - \"{{ port }}\"\n{% endfor %}",
    );
    project.write_stack(
        "web",
        "services:\n  # @include proxy\n  # @vars\n  # name: edge\n  # ports:\n  # - 80\n  # - 443\n",
    );

    strata_in(&project).args(["build", "web.yml.tpl"]).assert().success();

    assert_eq!(
        project.read("web.yml"),
        "services:\n  edge:\n    ports:\n      - \"80\"\n      - \"443\"\n"
    );
}

#[test]
fn test_include_variables_do_not_leak_to_siblings() {
    let project = TestProject::new();
    project.write_block("first", "first: {{ service_name }}\n");
    project.write_block("second", "second: {{ service_name }}\n");
    project.write_stack(
        "web",
        "services:\n  # @include first\n  # @vars\n  # service_name: proxy\n  # @include second\n",
    );

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Undefined variable 'service_name' in template 'second.yml.tpl'"));
}

#[test]
fn test_include_variables_do_not_leak_to_the_including_template() {
    let project = TestProject::new();
    project.write_block("a", "v: {{ x }}\n");
    project.write_stack("web", "# @include a\n# @vars\n# x: one\nafter: {{ x }}\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Undefined variable 'x' in template 'web.yml.tpl'"));

    assert!(!project.root().join("web.yml").exists());
}

#[test]
fn test_include_variables_reach_nested_includes_only() {
    let project = TestProject::new();
    project.write_block("a", "a:\n  # @include inner\n");
    project.write_block("inner", "v: {{ x }}\n");
    project.write_block("b", "b: two\n");
    project.write_stack("web", "# @include a\n# @vars\n# x: one\n# @include b\n");

    strata_in(&project).args(["build", "web.yml.tpl"]).assert().success();

    assert_eq!(project.read("web.yml"), "a:\n  v: one\nb: two\n");
}

#[test]
fn test_undefined_variable_fails_and_suggests_similar_names() {
    let project = TestProject::new();
    project.write_env("base.env", "POSTGRES_USER=app\n");
    project.write_stack("web", "user: {{ POSTGRES_USR }}\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Undefined variable 'POSTGRES_USR'"))
        .stderr(predicate::str::contains("Did you mean: POSTGRES_USER?"));

    assert!(!project.root().join("web.yml").exists());
}

#[test]
fn test_env_layers_apply_in_order() {
    let project = TestProject::new();
    project.write_env("base.env", "A=1\nB=1\n");
    project.write_env("docker.env", "B=2\nC=2\n");
    project.write_env("prod.env", "C=3\n");
    project.write_stack("web", "a: {{ A }}\nb: {{ B }}\nc: {{ C }}\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl", "--profile", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile 'prod'"));

    assert_eq!(project.read("web.yml"), "a: 1\nb: 2\nc: 3\n");
}

#[test]
fn test_user_env_defaults_are_the_lowest_layer() {
    let project = TestProject::new();
    std::fs::create_dir_all(project.user_root().join("vars")).unwrap();
    std::fs::write(project.user_root().join("config.yml"), "env:\n  defaults: [base.env]\n").unwrap();
    std::fs::write(project.user_root().join("vars/base.env"), "TZ=UTC\nTAG=user\n").unwrap();
    project.write_env("base.env", "TAG=project\n");
    project.write_stack("web", "tz: {{ TZ }}\ntag: {{ TAG }}\n");

    strata_in(&project).args(["build", "web.yml.tpl"]).assert().success();

    assert_eq!(project.read("web.yml"), "tz: UTC\ntag: project\n");
}

#[test]
fn test_missing_env_file_listed_in_project_config_fails() {
    let project = TestProject::new();
    project.write(".strata.yml", "env:\n  defaults: [bsae.env]\n");
    project.write_env("base.env", "APP=web\n");
    project.write_stack("web", "app: {{ APP }}\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Env file not found"))
        .stderr(predicate::str::contains("bsae.env (project layer)"));

    assert!(!project.root().join("web.yml").exists());
}

#[test]
fn test_missing_env_file_listed_in_user_config_fails() {
    let project = TestProject::new();
    std::fs::write(project.user_root().join("config.yml"), "env:\n  defaults: [base.env]\n").unwrap();
    project.write_stack("web", "x: 1\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base.env (default layer)"))
        .stderr(predicate::str::contains("config.yml in the user root"));
}

#[test]
fn test_user_blocks_directory_is_configurable() {
    let project = TestProject::new();
    std::fs::write(project.user_root().join("config.yml"), "paths:\n  blocks: shared\n").unwrap();
    std::fs::create_dir_all(project.user_root().join("shared")).unwrap();
    std::fs::write(project.user_root().join("shared/cache.yml.tpl"), "cache:\n  image: redis:7\n").unwrap();
    project.write_stack("web", "services:\n  # @include cache\n");

    strata_in(&project).args(["build", "web.yml.tpl"]).assert().success();

    assert_eq!(project.read("web.yml"), "services:\n  cache:\n    image: redis:7\n");
}

#[test]
fn test_unknown_profile_lists_known_profiles() {
    let project = TestProject::new();
    project.write_stack("web", "x: 1\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl", "-p", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown profile 'staging'"))
        .stderr(predicate::str::contains("Known profiles: dev, prod, qa"));
}

#[test]
fn test_malformed_env_line_reports_file_and_line() {
    let project = TestProject::new();
    project.write_env("base.env", "# comment\nA=1\nNOT_A_PAIR\n");
    project.write_stack("web", "x: 1\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed line 3"))
        .stderr(predicate::str::contains("base.env"));
}

#[test]
fn test_circular_include_is_rejected() {
    let project = TestProject::new();
    project.write_block("a", "a:\n  # @include b\n");
    project.write_block("b", "b:\n  # @include a\n");
    project.write_stack("web", "# @include a\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular include detected"))
        .stderr(predicate::str::contains("a → b"));

    assert!(!project.root().join("web.yml").exists());
}

#[test]
fn test_missing_block_names_search_roots() {
    let project = TestProject::new();
    project.write_block("postgres", "postgres: {}\n");
    project.write_stack("web", "# @include postgre\n");

    strata_in(&project)
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template 'postgre' not found"))
        .stderr(predicate::str::contains("Did you mean 'postgres'?"));
}

#[test]
fn test_repeated_builds_are_identical() {
    let project = TestProject::new();
    project.write_block("db", "db:\n  image: postgres\n");
    project.write_stack("web", "services:\n  # @include db\n  # @vars\n  # role: primary\n");

    strata_in(&project).args(["build", "web.yml.tpl"]).assert().success();
    let first_output = project.read("web.yml");
    let first_workspace = project.read("strata/build/db.yml.tpl") + &project.read("strata/build/web.yml.tpl");

    strata_in(&project).args(["build", "web.yml.tpl"]).assert().success();
    let second_workspace = project.read("strata/build/db.yml.tpl") + &project.read("strata/build/web.yml.tpl");

    assert_eq!(project.read("web.yml"), first_output);
    assert_eq!(second_workspace, first_workspace);
}

#[test]
fn test_build_requires_template_suffix() {
    let project = TestProject::new();
    project.write("web.yml", "x: 1\n");

    strata_in(&project)
        .args(["build", "web.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid stack path"));
}

#[test]
fn test_build_without_user_root_suggests_setup() {
    let project = TestProject::new();
    project.write_stack("web", "x: 1\n");

    strata_in(&project)
        .env("STRATA_HOME", project.root().join("no-such-home"))
        .args(["build", "web.yml.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Strata user directory not found"))
        .stderr(predicate::str::contains("strata setup"));
}

#[test]
fn test_home_flag_overrides_environment() {
    let project = TestProject::new();
    project.write_stack("web", "x: 1\n");

    strata_in(&project)
        .env("STRATA_HOME", project.root().join("no-such-home"))
        .arg("--home")
        .arg(project.user_root())
        .args(["build", "web.yml.tpl"])
        .assert()
        .success();
}

#[test]
fn test_verbose_prints_include_tree() {
    let project = TestProject::new();
    project.write_block("db", "db: {}\n");
    project.write_stack("web", "# @include db\n");

    strata_in(&project)
        .args(["--verbose", "build", "web.yml.tpl"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Include tree"));
}
