//! Deploy command.
//!
//! Deploys one application with values from the process environment.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::deploy::{DeployRequest, Deployer};
use crate::core::env::ProcessEnv;
use crate::core::settings::{Settings, TargetEnvironment};
use crate::error::Result;

/// Parsed `deploy` flags.
pub struct Args {
    pub app_dir: PathBuf,
    pub ops_dir: PathBuf,
    pub infra_dir: PathBuf,
    pub environment: String,
    pub namespace: Option<String>,
    pub image_tag: Option<String>,
}

/// Run the deploy pipeline.
pub fn execute(settings: &Settings, args: Args) -> Result<()> {
    let environment: TargetEnvironment = args.environment.parse()?;

    let request = DeployRequest {
        app_dir: args.app_dir,
        ops_dir: args.ops_dir,
        infra_dir: args.infra_dir,
        environment,
        namespace: args.namespace,
        image_tag: args.image_tag,
    };

    let outcome = Deployer::new(settings, &ProcessEnv)
        .deploy(&request)
        .map_err(|e| e.context("error running deploy process"))?;

    output::success(&format!("{} deployed", outcome.app_name));
    output::kv("namespace:", &outcome.namespace);
    output::kv("version:  ", &outcome.version);
    Ok(())
}
