//! Deployment descriptors.
//!
//! Loads `deploy.yaml` (one per application) and `infra.yaml` (shared
//! infrastructure) into typed, already-validated values. A missing file is
//! reported separately from a malformed one, unknown keys are ignored, and
//! field validation collects every problem before failing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Per-application deployment metadata from `deploy.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// Chart directory name under `<infraDir>/charts/`.
    pub chart: String,
    /// Variables substituted into the values template, in order.
    pub environment_vars: Vec<String>,
    /// Version recorded by the last `release`.
    pub latest_release_version: String,
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    chart: Option<String>,
    #[serde(rename = "environmentVars")]
    environment_vars: Option<Vec<String>>,
    #[serde(rename = "latestReleaseVersion")]
    latest_release_version: Option<String>,
}

impl ReleaseDescriptor {
    /// Path of the descriptor for `app_name` under `ops_dir`.
    pub fn path(ops_dir: &Path, app_name: &str) -> PathBuf {
        ops_dir.join(app_name).join(constants::DEPLOY_FILE)
    }

    /// Load and validate `<ops_dir>/<app_name>/deploy.yaml`.
    ///
    /// # Errors
    ///
    /// `ConfigError::PathNotFound` if the file is absent,
    /// `ConfigError::Parse` if it is not valid YAML of the expected shape,
    /// `ConfigError::MissingFields` listing every absent required key.
    pub fn load(ops_dir: &Path, app_name: &str) -> Result<Self> {
        let path = Self::path(ops_dir, app_name);
        let raw: RawDescriptor = read_yaml(&path, "file")?;

        let mut missing = Vec::new();
        if raw.chart.is_none() {
            missing.push("chart".to_string());
        }
        if raw.environment_vars.is_none() {
            missing.push("environmentVars".to_string());
        }
        if raw.latest_release_version.is_none() {
            missing.push("latestReleaseVersion".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields {
                path,
                fields: missing,
            }
            .into());
        }

        let descriptor = Self {
            chart: raw.chart.unwrap_or_default(),
            environment_vars: raw.environment_vars.unwrap_or_default(),
            latest_release_version: raw.latest_release_version.unwrap_or_default(),
        };
        debug!(
            path = %path.display(),
            chart = %descriptor.chart,
            vars = descriptor.environment_vars.len(),
            "descriptor loaded"
        );
        Ok(descriptor)
    }

    /// Rewrite `latestReleaseVersion` in the descriptor file, keeping every
    /// other key as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, not a mapping,
    /// or cannot be written back.
    pub fn record_release(ops_dir: &Path, app_name: &str, version: &str) -> Result<()> {
        let path = Self::path(ops_dir, app_name);
        let mut doc: serde_yaml::Mapping = read_yaml(&path, "file")?;

        doc.insert(
            serde_yaml::Value::from("latestReleaseVersion"),
            serde_yaml::Value::from(version),
        );

        let contents = serde_yaml::to_string(&doc).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&path, contents).map_err(|source| ConfigError::WriteFile {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), version, "descriptor updated");
        Ok(())
    }
}

/// Shared infrastructure from `infra.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfrastructureConfig {
    pub vendors: Vendors,
}

/// Vendor units, deployed scripts first and then charts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vendors {
    pub scripts: Vec<String>,
    pub charts: Vec<VendorChart>,
}

/// A chart-backed vendor component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorChart {
    pub name: String,
    /// Installer package reference (e.g. `bitnami/redis`).
    pub chart: String,
    pub namespace: String,
    pub release_name: String,
    /// Variables substituted into this vendor's values template, in order.
    pub envs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawInfra {
    vendors: Option<RawVendors>,
}

#[derive(Debug, Deserialize)]
struct RawVendors {
    #[serde(default)]
    scripts: Vec<String>,
    #[serde(default)]
    charts: Vec<RawVendorChart>,
}

#[derive(Debug, Deserialize)]
struct RawVendorChart {
    name: Option<String>,
    chart: Option<String>,
    namespace: Option<String>,
    #[serde(rename = "releaseName")]
    release_name: Option<String>,
    envs: Option<Vec<String>>,
}

impl RawVendorChart {
    /// Names of required fields that are absent or empty.
    fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("name", &self.name),
            ("chart", &self.chart),
            ("namespace", &self.namespace),
            ("releaseName", &self.release_name),
        ];
        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(field, _)| *field)
            .collect();
        if self.envs.is_none() {
            missing.push("envs");
        }
        missing
    }

    fn into_chart(self) -> VendorChart {
        VendorChart {
            name: self.name.unwrap_or_default(),
            chart: self.chart.unwrap_or_default(),
            namespace: self.namespace.unwrap_or_default(),
            release_name: self.release_name.unwrap_or_default(),
            envs: self.envs.unwrap_or_default(),
        }
    }
}

impl InfrastructureConfig {
    /// Path of `infra.yaml` under `infra_dir`.
    pub fn path(infra_dir: &Path) -> PathBuf {
        infra_dir.join(constants::INFRA_FILE)
    }

    /// Load and validate `<infra_dir>/infra.yaml`.
    ///
    /// Every chart is checked for every required field, and every script
    /// name for emptiness, before anything is reported.
    ///
    /// # Errors
    ///
    /// `ConfigError::PathNotFound` if the file is absent,
    /// `ConfigError::Parse` if it is malformed,
    /// `ConfigError::MissingFields` if `vendors` is absent,
    /// `ConfigError::InvalidVendors` listing every invalid unit.
    pub fn load(infra_dir: &Path) -> Result<Self> {
        let path = Self::path(infra_dir);
        let raw: RawInfra = read_yaml(&path, "infrastructure file")?;
        let config = Self::validate(&path, raw)?;
        debug!(
            path = %path.display(),
            scripts = config.vendors.scripts.len(),
            charts = config.vendors.charts.len(),
            "infrastructure config loaded"
        );
        Ok(config)
    }

    fn validate(path: &Path, raw: RawInfra) -> Result<Self> {
        let Some(vendors) = raw.vendors else {
            return Err(ConfigError::MissingFields {
                path: path.to_path_buf(),
                fields: vec!["vendors".to_string()],
            }
            .into());
        };

        let mut problems = Vec::new();
        for (i, script) in vendors.scripts.iter().enumerate() {
            if script.trim().is_empty() {
                problems.push(format!("scripts[{}]: empty name", i));
            }
        }
        for (i, chart) in vendors.charts.iter().enumerate() {
            let missing = chart.missing_fields();
            if !missing.is_empty() {
                let label = chart.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("<unnamed>");
                problems.push(format!(
                    "charts[{}] ({}): missing {}",
                    i,
                    label,
                    missing.join(", ")
                ));
            }
        }
        if !problems.is_empty() {
            return Err(ConfigError::InvalidVendors {
                path: path.to_path_buf(),
                problems,
            }
            .into());
        }

        Ok(Self {
            vendors: Vendors {
                scripts: vendors.scripts,
                charts: vendors
                    .charts
                    .into_iter()
                    .map(RawVendorChart::into_chart)
                    .collect(),
            },
        })
    }
}

/// Read a YAML file, distinguishing absence from malformed content.
fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path, what: &'static str) -> Result<T> {
    if !path.is_file() {
        return Err(ConfigError::PathNotFound {
            what,
            path: path.to_path_buf(),
        }
        .into());
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|e| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}
