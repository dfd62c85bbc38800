//! Vendor batch deploy.
//!
//! Runs the units listed in `infra.yaml`: every script unit, then every
//! chart unit, sequentially and in list order. A failing unit is logged and
//! the batch moves on; once all units have been attempted the batch fails
//! if any unit did, naming each one.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{error, info};

use crate::core::artifact::ValuesArtifact;
use crate::core::constants;
use crate::core::deploy::{require_dir, require_file};
use crate::core::descriptor::{InfrastructureConfig, VendorChart};
use crate::core::env::EnvSource;
use crate::core::installer::HelmRelease;
use crate::core::runner::Runner;
use crate::core::settings::{Settings, TargetEnvironment};
use crate::core::substitute;
use crate::error::{ConfigError, Error, Result, VendorError};

/// Kind of vendor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Script,
    Chart,
}

/// Result of one vendor unit.
#[derive(Debug)]
pub struct UnitReport {
    pub name: String,
    pub kind: UnitKind,
    pub result: Result<()>,
}

/// Results of a whole batch, in execution order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub units: Vec<UnitReport>,
}

impl BatchReport {
    pub fn failed(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.result.is_err())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.result.is_ok())
    }

    /// `Ok` when every unit succeeded, else `VendorError::BatchFailed`.
    pub fn into_result(self) -> Result<()> {
        let failed: Vec<String> = self.failed().map(|u| u.name.clone()).collect();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(VendorError::BatchFailed(failed).into())
        }
    }
}

/// Deploys the vendor units of one infrastructure directory.
pub struct VendorDeployer<'a, E: EnvSource + ?Sized> {
    settings: &'a Settings,
    env: &'a E,
    runner: Runner,
}

impl<'a, E: EnvSource + ?Sized> VendorDeployer<'a, E> {
    pub fn new(settings: &'a Settings, env: &'a E) -> Self {
        Self {
            settings,
            env,
            runner: Runner::new(),
        }
    }

    pub fn with_runner(mut self, runner: Runner) -> Self {
        self.runner = runner;
        self
    }

    /// Load `infra.yaml` and attempt every unit.
    ///
    /// # Errors
    ///
    /// Only configuration problems that prevent the batch from starting are
    /// returned here; per-unit failures are in the report.
    pub fn deploy(&self, infra_dir: &Path, environment: TargetEnvironment) -> Result<BatchReport> {
        info!("running vendors deploy for environment {}", environment);
        require_dir("infrastructure directory", infra_dir)?;
        let config = InfrastructureConfig::load(infra_dir)?;
        let vendors_dir = infra_dir.join(constants::VENDORS_DIR);

        let mut report = BatchReport::default();

        for script in &config.vendors.scripts {
            info!("deploying vendor {}", script);
            let result = self.deploy_script(&vendors_dir, script, environment);
            report.units.push(record(script, UnitKind::Script, result));
        }

        // Resolved once; a missing installer fails every chart unit.
        let helm = self.settings.installer_path();
        for chart in &config.vendors.charts {
            info!("deploying vendor {}", chart.name);
            let result = match &helm {
                Ok(helm) => self.deploy_chart(&vendors_dir, chart, environment, helm),
                Err(_) => Err(ConfigError::ToolNotFound(self.settings.helm_bin.clone()).into()),
            };
            report.units.push(record(&chart.name, UnitKind::Chart, result));
        }

        Ok(report)
    }

    fn deploy_script(&self, vendors_dir: &Path, name: &str, environment: TargetEnvironment) -> Result<()> {
        let vendor_dir = vendor_dir(vendors_dir, name);
        info!("vendor directory {}", vendor_dir.display());
        require_dir("vendor directory", &vendor_dir)?;

        let script = vendor_dir.join(constants::deploy_script_name(environment.as_str()));
        require_file("deploy script", &script)?;

        self.runner
            .run(&mut Command::new(&script))
            .map_err(|e| e.context(format!("error running deploy script {}", script.display())))?;
        info!("deployed script {}", script.display());
        Ok(())
    }

    fn deploy_chart(
        &self,
        vendors_dir: &Path,
        chart: &VendorChart,
        environment: TargetEnvironment,
        helm: &Path,
    ) -> Result<()> {
        let vendor_dir = vendor_dir(vendors_dir, &chart.name);
        info!("vendor directory {}", vendor_dir.display());
        require_dir("vendor directory", &vendor_dir)?;

        let values_template = vendor_dir.join(constants::values_file_name(environment.as_str()));
        require_file("helm values file", &values_template)?;

        let artifact = ValuesArtifact::from_template(&self.settings.scratch_dir, &values_template)?;
        substitute::apply(artifact.path(), &chart.envs, self.env, environment)?;

        info!("deploying vendor {} to namespace {}", chart.name, chart.namespace);
        HelmRelease {
            release_name: &chart.release_name,
            chart: &chart.chart,
            namespace: &chart.namespace,
            values_file: artifact.path(),
        }
        .install(&self.runner, helm)
        .map_err(|e| e.context(format!("error running helm upgrade for vendor {}", chart.name)))?;

        info!("vendor {} deployed", chart.name);
        Ok(())
    }
}

/// `<vendors_dir>/<lowercased name>`.
fn vendor_dir(vendors_dir: &Path, name: &str) -> PathBuf {
    vendors_dir.join(name.to_lowercase())
}

fn record(name: &str, kind: UnitKind, result: Result<()>) -> UnitReport {
    if let Err(e) = &result {
        error!("vendor {} failed: {}", name, e);
    }
    UnitReport {
        name: name.to_string(),
        kind,
        result,
    }
}

impl UnitReport {
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }
}
