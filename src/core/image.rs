//! Container image build, scan and push.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::core::constants;
use crate::core::runner::Runner;
use crate::core::settings::Settings;
use crate::error::Result;

/// Drives the container tool and the image scanner.
pub struct ImagePipeline<'a> {
    settings: &'a Settings,
    runner: Runner,
}

impl<'a> ImagePipeline<'a> {
    pub fn new(settings: &'a Settings, runner: Runner) -> Self {
        Self { settings, runner }
    }

    /// `docker build -t IMAGE -f <app>/Dockerfile <app>`
    pub fn build_command(&self, app_dir: &Path, image: &str) -> Command {
        let mut cmd = Command::new(&self.settings.docker_bin);
        cmd.args(["build", "-t", image, "-f"])
            .arg(app_dir.join(constants::DOCKERFILE))
            .arg(app_dir);
        cmd
    }

    /// `trivy image --severity HIGH,CRITICAL --exit-code 1 IMAGE`
    pub fn scan_command(&self, image: &str) -> Command {
        let mut cmd = Command::new(&self.settings.trivy_bin);
        cmd.args(["image", "--severity", "HIGH,CRITICAL", "--exit-code", "1", image]);
        cmd
    }

    /// `docker push IMAGE`
    pub fn push_command(&self, image: &str) -> Command {
        let mut cmd = Command::new(&self.settings.docker_bin);
        cmd.args(["push", image]);
        cmd
    }

    pub fn build(&self, app_dir: &Path, image: &str) -> Result<()> {
        self.runner
            .run(&mut self.build_command(app_dir, image))
            .map_err(|e| e.context("failed to build Docker image"))?;
        info!("built Docker image: {}", image);
        Ok(())
    }

    /// Fails when the scanner reports HIGH or CRITICAL findings.
    pub fn scan(&self, image: &str) -> Result<()> {
        self.runner
            .run(&mut self.scan_command(image))
            .map_err(|e| e.context("Trivy found security vulnerabilities"))?;
        info!("ran Trivy for security checks on Docker image: {}", image);
        Ok(())
    }

    pub fn push(&self, image: &str) -> Result<()> {
        self.runner
            .run(&mut self.push_command(image))
            .map_err(|e| e.context("failed to push Docker image"))?;
        info!("pushed Docker image to the private repository: {}", image);
        Ok(())
    }
}
