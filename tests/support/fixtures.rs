//! Workspace fixtures and fake external tools.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use super::Test;

const ENVIRONMENTS: [&str; 3] = ["development", "homolog", "production"];

/// Write an executable shell script.
pub fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{}", body)).expect("failed to write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("failed to chmod script");
}

impl Test {
    /// `package.json`, `deploy.yaml`, values files and chart directory for `name`.
    pub fn write_app(&self, name: &str, env_vars: &[&str], latest: &str, template: &str) {
        fs::write(
            self.app_dir().join("package.json"),
            format!(r#"{{"name": "{}", "version": "1.0.0"}}"#, name),
        )
        .expect("failed to write package.json");

        let ops = self.ops_dir().join(name);
        fs::create_dir_all(&ops).expect("failed to create ops dir");

        let vars: String = env_vars.iter().map(|v| format!("  - {}\n", v)).collect();
        let vars = if vars.is_empty() {
            " []\n".to_string()
        } else {
            format!("\n{}", vars)
        };
        fs::write(
            ops.join("deploy.yaml"),
            format!(
                "chart: {name}-chart\nenvironmentVars:{vars}latestReleaseVersion: {latest}\n",
            ),
        )
        .expect("failed to write deploy.yaml");

        for env in ENVIRONMENTS {
            fs::write(ops.join(format!("values.{}.yaml", env)), template)
                .expect("failed to write values file");
        }

        fs::create_dir_all(self.infra_dir().join("charts").join(format!("{}-chart", name)))
            .expect("failed to create chart dir");
    }

    /// Fake installer that records its arguments and a copy of `--values`.
    ///
    /// Exits with `exit_code` after recording.
    pub fn fake_helm(&self, exit_code: i32) -> PathBuf {
        let path = self.bin_dir().join("helm");
        let capture = self.capture_dir();
        write_script(
            &path,
            &format!(
                r#"echo "$@" >> "{capture}/helm.args"
while [ $# -gt 0 ]; do
  if [ "$1" = "--values" ]; then
    cp "$2" "{capture}/values.yaml"
    echo "$2" > "{capture}/values.path"
  fi
  shift
done
if [ {code} -ne 0 ]; then echo "release failed" >&2; fi
exit {code}
"#,
                capture = capture.display(),
                code = exit_code,
            ),
        );
        path
    }

    /// Fake container tool and scanner that log every call to `capture/tools.log`.
    pub fn fake_image_tools(&self, scan_exit: i32) {
        let log = self.capture_dir().join("tools.log");
        write_script(
            &self.bin_dir().join("docker"),
            &format!("echo \"docker $@\" >> \"{}\"\n", log.display()),
        );
        write_script(
            &self.bin_dir().join("trivy"),
            &format!(
                "echo \"trivy $@\" >> \"{}\"\nexit {}\n",
                log.display(),
                scan_exit
            ),
        );
    }

    pub fn tool_calls(&self) -> Vec<String> {
        fs::read_to_string(self.capture_dir().join("tools.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// `infra/infra.yaml` with the given body.
    pub fn write_infra(&self, yaml: &str) {
        fs::write(self.infra_dir().join("infra.yaml"), yaml).expect("failed to write infra.yaml");
    }

    /// `vendors/<name>/deploy.<env>.sh` that appends `name` to `capture/scripts.log`.
    pub fn vendor_script(&self, name: &str, env: &str, exit_code: i32) {
        let dir = self.infra_dir().join("vendors").join(name);
        fs::create_dir_all(&dir).expect("failed to create vendor dir");
        write_script(
            &dir.join(format!("deploy.{}.sh", env)),
            &format!(
                "echo {} >> \"{}\"\nexit {}\n",
                name,
                self.capture_dir().join("scripts.log").display(),
                exit_code
            ),
        );
    }

    /// `vendors/<name>/values.<env>.yaml`.
    pub fn vendor_values(&self, name: &str, env: &str, template: &str) {
        let dir = self.infra_dir().join("vendors").join(name);
        fs::create_dir_all(&dir).expect("failed to create vendor dir");
        fs::write(dir.join(format!("values.{}.yaml", env)), template)
            .expect("failed to write vendor values");
    }

    pub fn scripts_run(&self) -> Vec<String> {
        fs::read_to_string(self.capture_dir().join("scripts.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
