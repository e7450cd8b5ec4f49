//! Integration tests for the shellbox CLI surface.
//!
//! These exercise everything that can be tested without a container engine:
//! argument parsing, project initialization, and configuration validation.
//! Filesystem side effects are isolated with `tempfile::TempDir`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shellbox() -> Command {
    Command::cargo_bin("shellbox").unwrap()
}

fn write_config(dir: &TempDir, contents: &str) {
    std::fs::write(dir.path().join("shellbox.yaml"), contents).unwrap();
}

#[test]
fn test_version_output() {
    shellbox()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("shellbox version "));
}

#[test]
fn test_help_lists_subcommands() {
    shellbox()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("image"));
}

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();
    shellbox()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created shellbox.yaml"));

    let contents = std::fs::read_to_string(dir.path().join("shellbox.yaml")).unwrap();
    assert!(contents.contains("image: alpine:latest"));
    assert!(!dir.path().join("Dockerfile").exists());
}

#[test]
fn test_init_dockerfile_variant() {
    let dir = TempDir::new().unwrap();
    shellbox()
        .args(["init", "--dockerfile"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Dockerfile"));

    let contents = std::fs::read_to_string(dir.path().join("shellbox.yaml")).unwrap();
    assert!(contents.contains("dockerfile: ./Dockerfile"));
    assert!(dir.path().join("Dockerfile").exists());
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    shellbox().arg("init").current_dir(dir.path()).assert().success();
    shellbox()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_config_suggests_init() {
    let dir = TempDir::new().unwrap();
    shellbox()
        .arg("build")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"))
        .stderr(predicate::str::contains("shellbox init"));
}

#[test]
fn test_config_flag_points_elsewhere() {
    let dir = TempDir::new().unwrap();
    shellbox()
        .args(["build", "-c", "nested/custom.yaml"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nested/custom.yaml"));
}

#[test]
fn test_image_and_build_are_mutually_exclusive() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        "name: demo\ncontainer:\n  image: alpine\n  build:\n    dockerfile: ./Dockerfile\n",
    );
    shellbox()
        .arg("build")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_unknown_provider_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        "name: demo\ncontainer:\n  provider: lxc\n  image: alpine\n",
    );
    shellbox()
        .arg("build")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid provider"));
}

#[test]
fn test_duplicate_script_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        concat!(
            "name: demo\n",
            "container:\n  image: alpine\n",
            "shell:\n  scripts:\n",
            "    - name: hello\n      commands: echo one\n",
            "    - name: hello\n      commands: echo two\n",
        ),
    );
    shellbox()
        .arg("run")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate script name"));
}

#[test]
fn test_malformed_yaml_reports_path() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "name: [unclosed\n");
    shellbox()
        .arg("build")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"))
        .stderr(predicate::str::contains("shellbox.yaml"));
}
