//! Deployer - DevOps management made easy.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deployer::cli::output;
use deployer::cli::{execute, Cli};
use deployer::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // DEPLOYER_LOG wins over --verbose
    let filter = EnvFilter::try_from_env("DEPLOYER_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("deployer=debug")
        } else {
            EnvFilter::new("deployer=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, &cli.tools) {
        let error_msg = e.to_string();
        let suggestion = match e.root() {
            Error::Config(ConfigError::ToolNotFound(tool)) => {
                Some(format!("install {} or point --helm-bin/--docker-bin/--trivy-bin at it", tool))
            }
            Error::Config(ConfigError::MissingCredentials(_)) => {
                Some("export DOCKER_USERNAME and DOCKER_PASSWORD".to_string())
            }
            Error::Config(ConfigError::InvalidEnvironment(_)) => {
                Some("use one of: development, homolog, production".to_string())
            }
            Error::Env(env) => {
                let missing = env.missing();
                if missing.is_empty() {
                    None
                } else {
                    Some(format!("export {}", missing.join(" ")))
                }
            }
            _ => None,
        };

        output::error(&error_msg);
        if let Some(hint) = suggestion {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
