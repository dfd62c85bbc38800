//! Single-application deploy pipeline.
//!
//! validate inputs → resolve descriptor → select version → prepare the
//! values artifact → substitute → invoke the installer. Any step failing
//! aborts the deploy; the artifact is removed on every path.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::artifact::ValuesArtifact;
use crate::core::constants;
use crate::core::descriptor::ReleaseDescriptor;
use crate::core::env::{EnvSource, Overlay};
use crate::core::installer::{self, HelmRelease};
use crate::core::manifest::Manifest;
use crate::core::runner::Runner;
use crate::core::settings::{Settings, TargetEnvironment};
use crate::core::substitute;
use crate::error::{ConfigError, Result};

/// Inputs for one application deploy.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub app_dir: PathBuf,
    pub ops_dir: PathBuf,
    pub infra_dir: PathBuf,
    pub environment: TargetEnvironment,
    /// Defaults to the application name.
    pub namespace: Option<String>,
    /// Overrides the descriptor's latest release version.
    pub image_tag: Option<String>,
}

/// Summary of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub app_name: String,
    pub namespace: String,
    pub version: String,
}

/// Runs application deploys against one environment source.
pub struct Deployer<'a, E: EnvSource + ?Sized> {
    settings: &'a Settings,
    env: &'a E,
    runner: Runner,
}

impl<'a, E: EnvSource + ?Sized> Deployer<'a, E> {
    pub fn new(settings: &'a Settings, env: &'a E) -> Self {
        Self {
            settings,
            env,
            runner: Runner::new(),
        }
    }

    /// Use a specific runner (e.g. a quiet one).
    pub fn with_runner(mut self, runner: Runner) -> Self {
        self.runner = runner;
        self
    }

    /// Deploy one application.
    ///
    /// # Errors
    ///
    /// Configuration errors before any side effect, `EnvError` listing every
    /// unset variable, artifact errors, or the installer's `ProcessError`.
    pub fn deploy(&self, req: &DeployRequest) -> Result<DeployOutcome> {
        // Validating inputs
        require_dir("application directory", &req.app_dir)?;
        require_dir("operations directory", &req.ops_dir)?;
        require_dir("infrastructure directory", &req.infra_dir)?;
        let helm = self.settings.installer_path()?;

        let manifest = Manifest::load(&req.app_dir, false)?;
        let app_name = manifest.name();
        info!("read manifest: name={}", app_name);

        // Resolving descriptor
        let descriptor = ReleaseDescriptor::load(&req.ops_dir, app_name)?;

        // Selecting version
        let version = select_version(req.image_tag.as_deref(), &descriptor);
        info!("selected release version {}", version);

        let values_template = req
            .ops_dir
            .join(app_name)
            .join(constants::values_file_name(req.environment.as_str()));
        require_file("values file", &values_template)?;

        let chart_dir = installer::chart_dir(&req.infra_dir, &descriptor.chart);
        require_dir("chart", &chart_dir)?;

        // Preparing artifact
        let artifact = ValuesArtifact::from_template(&self.settings.scratch_dir, &values_template)?;

        // Substituting
        let mut names = descriptor.environment_vars.clone();
        names.push(constants::IMAGE_TAG.to_string());
        let bindings = Overlay::new(self.env).bind(constants::IMAGE_TAG, version);
        substitute::apply(artifact.path(), &names, &bindings, req.environment)?;

        // Invoking
        let namespace = req
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| app_name.to_string());
        info!("deploying application {} to namespace {}", app_name, namespace);

        let chart = chart_dir.to_string_lossy();
        HelmRelease {
            release_name: app_name,
            chart: &chart,
            namespace: &namespace,
            values_file: artifact.path(),
        }
        .install(&self.runner, &helm)
        .map_err(|e| e.context(format!("error running helm upgrade for {}", app_name)))?;

        info!("application {} deployed", app_name);
        Ok(DeployOutcome {
            app_name: app_name.to_string(),
            namespace,
            version: version.to_string(),
        })
    }
}

/// The explicit override when given and non-empty, else the recorded version.
pub fn select_version<'a>(image_tag: Option<&'a str>, descriptor: &'a ReleaseDescriptor) -> &'a str {
    image_tag
        .filter(|tag| !tag.is_empty())
        .unwrap_or(&descriptor.latest_release_version)
}

pub(crate) fn require_dir(what: &'static str, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(ConfigError::PathNotFound {
            what,
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

pub(crate) fn require_file(what: &'static str, path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ConfigError::PathNotFound {
            what,
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}
