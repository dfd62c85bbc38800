//! Deployer - DevOps management made easy.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── deploy        # Deploy one application
//! │   ├── release       # Build, scan, push and record a release
//! │   ├── vendors       # Deploy shared infrastructure vendors
//! │   ├── test          # Functional endpoint probe
//! │   ├── version       # Print the version
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── artifact      # Owner-only temporary values files
//!     ├── substitute    # <NAME> placeholder substitution
//!     ├── runner        # External command execution and output capture
//!     ├── descriptor    # deploy.yaml and infra.yaml
//!     ├── manifest      # package.json name and version
//!     ├── installer     # helm upgrade --install
//!     ├── deploy        # Application deploy pipeline
//!     ├── vendors       # Vendor batch deploy
//!     ├── image         # docker build/push and trivy scan
//!     ├── registry      # Registry tag lookup
//!     ├── release       # Release workflow
//!     └── probe         # Functional check
//! ```
//!
//! # Features
//!
//! - Values files never touch persistent storage and are removed on every path
//! - Secrets are masked in production logs
//! - Missing variables are reported together, not one at a time
//! - Vendor batches attempt every unit before failing

pub mod cli;
pub mod core;
pub mod error;
