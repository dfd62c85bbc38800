//! Per-invocation settings.
//!
//! Built once from global CLI flags (each backed by an environment variable)
//! and passed by reference through every pipeline. There is no global state.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// External tools and locations used by the pipelines.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Installer executable (`helm`).
    pub helm_bin: String,
    /// Container tool executable (`docker`).
    pub docker_bin: String,
    /// Image scanner executable (`trivy`).
    pub trivy_bin: String,
    /// Directory holding values artifacts while an operation runs.
    pub scratch_dir: PathBuf,
    /// Registry API base URL used for tag lookups.
    pub registry_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            helm_bin: "helm".to_string(),
            docker_bin: "docker".to_string(),
            trivy_bin: "trivy".to_string(),
            scratch_dir: default_scratch_dir(),
            registry_url: "https://hub.docker.com".to_string(),
        }
    }
}

impl Settings {
    /// Resolve the installer on `PATH` (or as a direct path).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ToolNotFound` when the binary cannot be located.
    pub fn installer_path(&self) -> Result<PathBuf> {
        which::which(&self.helm_bin)
            .map_err(|_| ConfigError::ToolNotFound(self.helm_bin.clone()).into())
    }
}

/// `/dev/shm` when present, the OS temp dir otherwise.
pub fn default_scratch_dir() -> PathBuf {
    let shm = Path::new(constants::SCRATCH_DIR);
    if shm.is_dir() {
        shm.to_path_buf()
    } else {
        std::env::temp_dir()
    }
}

/// Deployment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEnvironment {
    Development,
    Homolog,
    Production,
}

impl TargetEnvironment {
    /// Every accepted target, in promotion order.
    pub const ALL: [TargetEnvironment; 3] = [
        TargetEnvironment::Development,
        TargetEnvironment::Homolog,
        TargetEnvironment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetEnvironment::Development => "development",
            TargetEnvironment::Homolog => "homolog",
            TargetEnvironment::Production => constants::PRODUCTION,
        }
    }

    /// Whether substituted values must be masked in logs.
    pub fn is_production(&self) -> bool {
        matches!(self, TargetEnvironment::Production)
    }

    /// Value as it should appear in the operator log.
    pub fn mask<'a>(&self, value: &'a str) -> &'a str {
        if self.is_production() {
            constants::MASK
        } else {
            value
        }
    }
}

impl FromStr for TargetEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidEnvironment(s.to_string()))
    }
}

impl std::fmt::Display for TargetEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
