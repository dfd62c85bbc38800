//! Release command.
//!
//! Builds, scans and pushes the application image, then records the version.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::Password;
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::constants;
use crate::core::image::ImagePipeline;
use crate::core::registry::DockerHub;
use crate::core::release::{self, ReleaseRequest};
use crate::core::runner::Runner;
use crate::core::settings::Settings;
use crate::error::Result;

/// Run the release workflow.
pub fn execute(
    settings: &Settings,
    app_dir: PathBuf,
    ops_dir: PathBuf,
    username: String,
) -> Result<()> {
    let password = read_password()?;

    let request = ReleaseRequest {
        app_dir,
        ops_dir,
        username,
        password,
    };
    request.check_credentials()?;

    let registry = DockerHub::new(&settings.registry_url, &request.username, &request.password)?;
    let images = ImagePipeline::new(settings, Runner::new());

    let outcome = release::run(&request, &registry, &images)
        .map_err(|e| e.context("error running release process"))?;

    output::success(&format!("released {}", outcome.image));
    output::kv("next version:", &outcome.next_version);
    Ok(())
}

/// Registry password from the environment, else prompted (hidden) or piped.
fn read_password() -> Result<Zeroizing<String>> {
    if let Ok(token) = std::env::var(constants::REGISTRY_PASSWORD_VAR) {
        if !token.is_empty() {
            info!(
                "using Docker token from environment variable {}",
                constants::REGISTRY_PASSWORD_VAR
            );
            return Ok(Zeroizing::new(token));
        }
    }

    let token = if io::stdin().is_terminal() {
        Password::new()
            .with_prompt("Docker password/token")
            .interact()?
    } else {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        input.trim().to_string()
    };
    Ok(Zeroizing::new(token))
}
