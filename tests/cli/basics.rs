//! Help, version and completions.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();
    let output = t.cmd().arg("--help").output().unwrap();

    assert_success(&output);
    for command in ["deploy", "release", "vendors", "test", "version", "completions"] {
        assert_stdout_contains(&output, command);
    }
}

#[test]
fn test_version_command() {
    let t = Test::new();
    let output = t.cmd().arg("version").output().unwrap();

    assert_success(&output);
    assert_stdout_contains(
        &output,
        &format!("deployer version {}", env!("CARGO_PKG_VERSION")),
    );
}

#[test]
fn test_completions_bash() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_deployer"));
}

#[test]
fn test_unknown_shell_rejected() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_deploy_help_shows_flags() {
    let t = Test::new();
    let output = t.cmd().args(["deploy", "--help"]).output().unwrap();

    assert_success(&output);
    for flag in [
        "--application-directory",
        "--operations-directory",
        "--infrastructure-directory",
        "--target-environment",
        "--namespace",
        "--image-tag",
    ] {
        assert_stdout_contains(&output, flag);
    }
}
