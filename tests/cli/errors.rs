//! Error reporting and hints.

use crate::support::*;

#[test]
fn test_deploy_requires_flags() {
    let t = Test::new();
    let output = t.cmd().arg("deploy").output().unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "--application-directory");
}

#[test]
fn test_deploy_missing_application_directory() {
    let t = Test::new();
    t.fake_helm(0);

    let output = t
        .cmd()
        .args(["deploy", "-d", "missing", "-o", "ops", "-i", "infra", "-e", "development"])
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "application directory");
    assert_stderr_contains(&output, "does not exist");
    assert!(t.captured_args().is_empty());
}

#[test]
fn test_deploy_missing_installer_hint() {
    let t = Test::with_app("web", &[], "1.0.0", "tag: <IMAGE_TAG>\n");

    let output = t.deploy("development", &[]);

    assert_failure(&output);
    assert_stderr_contains(&output, "not found on PATH");
    assert_stderr_contains(&output, "install");
}

#[test]
fn test_snake_case_aliases_accepted() {
    let t = Test::with_app("web", &[], "1.0.0", "tag: <IMAGE_TAG>\n");
    t.fake_helm(0);

    let output = t
        .cmd()
        .arg("deploy")
        .arg("--application_directory")
        .arg(t.app_dir())
        .arg("--operations_directory")
        .arg(t.ops_dir())
        .arg("--infrastructure_directory")
        .arg(t.infra_dir())
        .args(["--target_environment", "development"])
        .output()
        .unwrap();

    assert_success(&output);
}

#[test]
fn test_release_missing_credentials() {
    let t = Test::with_app("web", &[], "1.0.0", "");

    let output = t
        .cmd()
        .arg("release")
        .arg("-d")
        .arg(t.app_dir())
        .arg("-o")
        .arg(t.ops_dir())
        .args(["-u", ""])
        .env_remove("DOCKER_PASSWORD")
        .write_stdin("")
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "missing required fields: username, password");
    assert!(t.tool_calls().is_empty());
}
