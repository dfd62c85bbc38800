//! Command-line interface.

pub mod completions;
pub mod deploy;
pub mod output;
pub mod release;
pub mod vendors;
pub mod version;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::settings::{self, Settings};

/// Deployer - DevOps management made easy.
#[derive(Parser)]
#[command(
    name = "deployer",
    about = "DevOps management made easy",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub tools: ToolArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// External tools and locations, overridable per invocation.
#[derive(Args, Debug, Clone)]
pub struct ToolArgs {
    /// Release manager executable
    #[arg(long, env = "DEPLOYER_HELM_BIN", default_value = "helm", global = true)]
    pub helm_bin: String,

    /// Container tool executable
    #[arg(long, env = "DEPLOYER_DOCKER_BIN", default_value = "docker", global = true)]
    pub docker_bin: String,

    /// Image scanner executable
    #[arg(long, env = "DEPLOYER_TRIVY_BIN", default_value = "trivy", global = true)]
    pub trivy_bin: String,

    /// Directory for temporary values files [default: /dev/shm]
    #[arg(long, env = "DEPLOYER_SCRATCH_DIR", global = true)]
    pub scratch_dir: Option<PathBuf>,

    /// Registry API base URL
    #[arg(
        long,
        env = "DEPLOYER_REGISTRY_URL",
        default_value = "https://hub.docker.com",
        global = true
    )]
    pub registry_url: String,
}

impl ToolArgs {
    pub fn settings(&self) -> Settings {
        Settings {
            helm_bin: self.helm_bin.clone(),
            docker_bin: self.docker_bin.clone(),
            trivy_bin: self.trivy_bin.clone(),
            scratch_dir: self
                .scratch_dir
                .clone()
                .unwrap_or_else(settings::default_scratch_dir),
            registry_url: self.registry_url.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the application
    Deploy {
        /// The path of the application directory
        #[arg(short = 'd', long, alias = "application_directory")]
        application_directory: PathBuf,
        /// The path of the operations directory
        #[arg(short = 'o', long, alias = "operations_directory")]
        operations_directory: PathBuf,
        /// The path of the infrastructure directory
        #[arg(short = 'i', long, alias = "infrastructure_directory")]
        infrastructure_directory: PathBuf,
        /// The environment to deploy to
        #[arg(short = 'e', long, alias = "target_environment")]
        target_environment: String,
        /// The namespace to deploy to [default: application name]
        #[arg(short = 'n', long)]
        namespace: Option<String>,
        /// The image tag to use [default: latestReleaseVersion]
        #[arg(short = 't', long, alias = "image_tag")]
        image_tag: Option<String>,
    },

    /// Release the application
    Release {
        /// The path of the application directory
        #[arg(short = 'd', long, alias = "application_directory")]
        application_directory: PathBuf,
        /// The path of the operations directory
        #[arg(short = 'o', long, alias = "operations_directory")]
        operations_directory: PathBuf,
        /// The username to access the private repository
        #[arg(short = 'u', long, env = "DOCKER_USERNAME")]
        username: String,
    },

    /// Manage shared infrastructure vendors
    Vendors {
        #[command(subcommand)]
        action: VendorsAction,
    },

    /// Test the application
    Test {
        #[command(subcommand)]
        action: TestAction,
    },

    /// Show deployer version
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Vendor subcommands.
#[derive(Subcommand)]
pub enum VendorsAction {
    /// Deploy every vendor listed in infra.yaml
    Deploy {
        /// The path of the infrastructure directory
        #[arg(short = 'i', long, alias = "infrastructure_directory")]
        infrastructure_directory: PathBuf,
        /// The environment to deploy to
        #[arg(short = 'e', long, alias = "target_environment")]
        target_environment: String,
    },
}

/// Test subcommands.
#[derive(Subcommand)]
pub enum TestAction {
    /// Run the functional test
    Functional {
        /// The path of the application directory
        #[arg(short = 'd', long, alias = "application_directory")]
        application_directory: PathBuf,
        /// The host of the application (repeatable)
        #[arg(short = 'u', long, required = true)]
        host: Vec<String>,
        /// The endpoint of the application
        #[arg(short = 'e', long)]
        endpoint: String,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command, tools: &ToolArgs) -> crate::error::Result<()> {
    use Command::*;

    let settings = tools.settings();

    match command {
        Deploy {
            application_directory,
            operations_directory,
            infrastructure_directory,
            target_environment,
            namespace,
            image_tag,
        } => deploy::execute(
            &settings,
            deploy::Args {
                app_dir: application_directory,
                ops_dir: operations_directory,
                infra_dir: infrastructure_directory,
                environment: target_environment,
                namespace,
                image_tag,
            },
        ),
        Release {
            application_directory,
            operations_directory,
            username,
        } => release::execute(&settings, application_directory, operations_directory, username),
        Vendors { action } => match action {
            VendorsAction::Deploy {
                infrastructure_directory,
                target_environment,
            } => vendors::deploy(&settings, &infrastructure_directory, &target_environment),
        },
        Test { action } => match action {
            TestAction::Functional {
                application_directory,
                host,
                endpoint,
            } => test::functional(&application_directory, &host, &endpoint),
        },
        Version => version::execute(),
        Completions { shell } => completions::execute(shell),
    }
}
