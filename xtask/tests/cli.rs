use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn checkout_fixture() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("pyproject.toml"), "[project]\nname = \"lodestar\"\n")
        .expect("fixture pyproject");
    dir
}

fn xtask() -> Command {
    let mut command = Command::cargo_bin("xtask").expect("binary builds");
    command
        .env_remove("GITHUB_WORKSPACE")
        .env_remove("LODESTAR_TEST_COVERAGE")
        .env_remove("LOCAL_SILICA_DIR")
        .env_remove("LODESTAR_ROOT");
    command
}

#[test]
fn help_lists_every_session() {
    xtask()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("watch-docs"))
        .stdout(predicate::str::contains("build-docs-multiversion"))
        .stdout(predicate::str::contains("typecheck-pyright"))
        .stdout(predicate::str::contains("dist-docs"));
}

#[test]
fn list_shows_the_default_set_marker() {
    xtask()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("typecheck-mypy"))
        .stdout(predicate::str::contains("build-docset"))
        .stdout(predicate::str::contains("* runs by default"));
}

#[test]
fn list_needs_no_checkout() {
    xtask().args(["--root", "/nonexistent/lodestar", "list"]).assert().success();
}

#[test]
fn unknown_session_is_rejected() {
    xtask().arg("make-coffee").assert().failure();
}

#[test]
fn missing_root_is_rejected() {
    xtask()
        .args(["--root", "/nonexistent/lodestar", "lint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn root_without_pyproject_is_rejected() {
    let dir = TempDir::new().expect("tempdir");

    xtask()
        .arg("--root")
        .arg(dir.path())
        .arg("lint")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing pyproject.toml"));
}

#[test]
fn root_can_come_from_the_environment() {
    xtask()
        .arg("lint")
        .env("LODESTAR_ROOT", "/nonexistent/lodestar")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn dangling_silica_override_aborts_before_any_environment_work() {
    let dir = checkout_fixture();

    xtask()
        .arg("--root")
        .arg(dir.path())
        .arg("test")
        .env("LOCAL_SILICA_DIR", "/nonexistent/silica")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOCAL_SILICA_DIR"))
        .stderr(predicate::str::contains("does not exist"));

    assert!(
        !dir.path().join("build").join("venvs").exists(),
        "no session environment should be created"
    );
}

#[test]
fn malformed_test_config_aborts_before_any_environment_work() {
    let dir = checkout_fixture();
    let tests_dir = dir.path().join("build").join("tests");
    fs::create_dir_all(&tests_dir).expect("tests dir");
    fs::write(tests_dir.join("test_config.json"), "{not json").expect("broken config");

    xtask()
        .arg("--root")
        .arg(dir.path())
        .arg("test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed test config"));

    assert!(
        !dir.path().join("build").join("venvs").exists(),
        "no session environment should be created"
    );
}
