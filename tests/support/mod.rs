//! Test support utilities for deployer integration tests.
//!
//! Provides an isolated workspace (application, operations, infrastructure
//! and scratch directories) plus fake external tools.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::{Path, PathBuf};

use deployer::core::settings::Settings;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// No process-global state is mutated; child processes get their
/// environment through `.env()` so tests can run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create an empty workspace with `app`, `ops`, `infra`, `scratch`,
    /// `capture` and `bin` directories.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        for sub in ["app", "ops", "infra/charts", "infra/vendors", "scratch", "capture", "bin"] {
            fs::create_dir_all(dir.path().join(sub)).expect("failed to create workspace dir");
        }
        Self { dir }
    }

    /// Workspace with application `name` whose descriptor lists `env_vars`.
    ///
    /// Every environment gets `template` as its values file.
    pub fn with_app(name: &str, env_vars: &[&str], latest: &str, template: &str) -> Self {
        let t = Self::new();
        t.write_app(name, env_vars, latest, template);
        t
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root().join("app")
    }

    pub fn ops_dir(&self) -> PathBuf {
        self.root().join("ops")
    }

    pub fn infra_dir(&self) -> PathBuf {
        self.root().join("infra")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root().join("scratch")
    }

    pub fn capture_dir(&self) -> PathBuf {
        self.root().join("capture")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root().join("bin")
    }

    /// Settings pointing every tool at `bin/` and artifacts at `scratch/`.
    pub fn settings(&self) -> Settings {
        Settings {
            helm_bin: self.bin_dir().join("helm").to_string_lossy().into_owned(),
            docker_bin: self.bin_dir().join("docker").to_string_lossy().into_owned(),
            trivy_bin: self.bin_dir().join("trivy").to_string_lossy().into_owned(),
            scratch_dir: self.scratch_dir(),
            registry_url: "http://127.0.0.1:9".to_string(),
        }
    }

    /// Number of files left in the scratch directory.
    pub fn scratch_entries(&self) -> usize {
        fs::read_dir(self.scratch_dir())
            .expect("failed to read scratch dir")
            .count()
    }

    /// Values file content the fake installer received, if it ran.
    pub fn captured_values(&self) -> Option<String> {
        fs::read_to_string(self.capture_dir().join("values.yaml")).ok()
    }

    /// Arguments of every fake installer run, one line per run.
    pub fn captured_args(&self) -> Vec<String> {
        fs::read_to_string(self.capture_dir().join("helm.args"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
