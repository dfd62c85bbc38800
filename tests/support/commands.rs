//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a deployer command wired to the workspace.
    ///
    /// Returns a Command configured with:
    /// - every tool flag's env var pointing into `bin/`
    /// - the scratch directory set to `scratch/`
    /// - colors and `DEPLOYER_LOG` cleared
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("deployer").expect("failed to find deployer binary");
        let settings = self.settings();
        cmd.env("DEPLOYER_HELM_BIN", &settings.helm_bin)
            .env("DEPLOYER_DOCKER_BIN", &settings.docker_bin)
            .env("DEPLOYER_TRIVY_BIN", &settings.trivy_bin)
            .env("DEPLOYER_SCRATCH_DIR", &settings.scratch_dir)
            .env("NO_COLOR", "1")
            .env_remove("DEPLOYER_LOG")
            .current_dir(self.root());
        cmd
    }

    /// `deployer deploy` against the workspace directories.
    pub fn deploy_cmd(&self, environment: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("deploy")
            .arg("-d")
            .arg(self.app_dir())
            .arg("-o")
            .arg(self.ops_dir())
            .arg("-i")
            .arg(self.infra_dir())
            .args(["-e", environment]);
        cmd
    }

    /// Shortcut for `deployer deploy` with extra variables set.
    pub fn deploy(&self, environment: &str, vars: &[(&str, &str)]) -> Output {
        let mut cmd = self.deploy_cmd(environment);
        for (k, v) in vars {
            cmd.env(k, v);
        }
        cmd.output().expect("failed to run deployer deploy")
    }

    /// Shortcut for `deployer vendors deploy`.
    pub fn vendors_deploy(&self, environment: &str, vars: &[(&str, &str)]) -> Output {
        let mut cmd = self.cmd();
        cmd.args(["vendors", "deploy", "-i"])
            .arg(self.infra_dir())
            .args(["-e", environment]);
        for (k, v) in vars {
            cmd.env(k, v);
        }
        cmd.output().expect("failed to run deployer vendors deploy")
    }
}
