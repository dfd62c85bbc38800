//! Constants used throughout deployer.
//!
//! Centralizes file names, well-known variables and installer flags.

/// Application descriptor file, under `<opsDir>/<appName>/`.
pub const DEPLOY_FILE: &str = "deploy.yaml";

/// Infrastructure file, under the infrastructure directory.
pub const INFRA_FILE: &str = "infra.yaml";

/// Application manifest file, under the application directory.
pub const MANIFEST_FILE: &str = "package.json";

/// Dockerfile used by `release`, under the application directory.
pub const DOCKERFILE: &str = "Dockerfile";

/// Charts directory relative to the infrastructure directory.
pub const CHARTS_DIR: &str = "charts";

/// Vendors directory relative to the infrastructure directory.
pub const VENDORS_DIR: &str = "vendors";

/// Variable bound by the program itself to the selected release version.
pub const IMAGE_TAG: &str = "IMAGE_TAG";

/// Environment whose substituted values are masked in logs.
pub const PRODUCTION: &str = "production";

/// Replacement logged instead of a value in production.
pub const MASK: &str = "******";

/// Volatile scratch directory for values artifacts.
pub const SCRATCH_DIR: &str = "/dev/shm";

/// Registry password read by `release`.
pub const REGISTRY_PASSWORD_VAR: &str = "DOCKER_PASSWORD";

/// Flags passed to the installer on every invocation, after the release name and chart.
///
/// `--values` and `--namespace` are inserted before these.
pub const INSTALLER_POLICY_FLAGS: &[&str] = &["--create-namespace", "--wait"];

/// Values template name for an environment (`values.<env>.yaml`).
pub fn values_file_name(environment: &str) -> String {
    format!("values.{}.yaml", environment)
}

/// Vendor deploy script name for an environment (`deploy.<env>.sh`).
pub fn deploy_script_name(environment: &str) -> String {
    format!("deploy.{}.sh", environment)
}
