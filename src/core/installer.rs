//! Release manager invocation.
//!
//! Every release goes through one invocation shape: upgrade-or-install,
//! namespace created if absent, and a blocking wait until the release
//! settles.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::constants;
use crate::core::runner::Runner;
use crate::error::Result;

/// One upgrade-or-install of a chart into a namespace.
#[derive(Debug, Clone)]
pub struct HelmRelease<'a> {
    pub release_name: &'a str,
    /// Local chart directory or repository reference.
    pub chart: &'a str,
    pub namespace: &'a str,
    pub values_file: &'a Path,
}

impl HelmRelease<'_> {
    /// Build the installer command.
    pub fn command(&self, helm: &Path) -> Command {
        let mut cmd = Command::new(helm);
        cmd.args(["upgrade", "--install", self.release_name, self.chart])
            .arg("--values")
            .arg(self.values_file)
            .args(["--namespace", self.namespace])
            .args(constants::INSTALLER_POLICY_FLAGS);
        cmd
    }

    /// Run the installer and return its captured output.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError` (with the installer's output) on failure.
    pub fn install(&self, runner: &Runner, helm: &Path) -> Result<Vec<u8>> {
        runner.run(&mut self.command(helm))
    }
}

/// Chart directory for an application chart under `infra_dir`.
pub fn chart_dir(infra_dir: &Path, chart: &str) -> PathBuf {
    infra_dir.join(constants::CHARTS_DIR).join(chart)
}
