//! Error types for deployer.
//!
//! Each pipeline layer has its own error enum; they all convert into
//! [`Error`] so commands can use `?` throughout.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Top-level error returned by every command.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error(transparent)]
    Vendor(#[from] VendorError),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    /// Wrap this error with a description of what was being attempted.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any context layers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Configuration problems detected before any external side effect.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{what} {} does not exist", .path.display())]
    PathNotFound { what: &'static str, path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("the following fields are missing from {}: {}", .path.display(), .fields.join(", "))]
    MissingFields { path: PathBuf, fields: Vec<String> },

    #[error("invalid vendors in {}:\n{}", .path.display(), .problems.join("\n"))]
    InvalidVendors { path: PathBuf, problems: Vec<String> },

    #[error("invalid version '{0}': expected MAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    #[error("invalid environment '{0}': expected development, homolog or production")]
    InvalidEnvironment(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("{0} not found on PATH")]
    ToolNotFound(String),
}

/// Required environment variables that could not be substituted.
///
/// Always carries every failing name from one substitution pass.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("error setting environment variables:\n{}", format_failures(.0))]
    Substitution(Vec<VarFailure>),
}

impl EnvError {
    /// Names that were not set, in the order they were requested.
    pub fn missing(&self) -> Vec<&str> {
        match self {
            EnvError::Substitution(failures) => failures
                .iter()
                .filter(|f| matches!(f.reason, VarFailureReason::Unset))
                .map(|f| f.name.as_str())
                .collect(),
        }
    }
}

fn format_failures(failures: &[VarFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One variable that could not be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarFailure {
    pub name: String,
    pub reason: VarFailureReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarFailureReason {
    /// Unset, empty, or an empty name.
    Unset,
    /// The values file could not be rewritten.
    Rewrite(String),
}

impl std::fmt::Display for VarFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            VarFailureReason::Unset => write!(f, "{} not set", self.name),
            VarFailureReason::Rewrite(reason) => {
                write!(f, "error setting {}: {}", self.name, reason)
            }
        }
    }
}

/// Temporary values artifact failures.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("error writing file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to get current user information: {0}")]
    UnknownUser(String),

    #[error("error changing ownership of file {}: {source}", .path.display())]
    Chown {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
}

/// External command failures. Captured output is kept for diagnostics.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("error starting command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` failed ({status}):\n{}", String::from_utf8_lossy(.output))]
    Failed {
        command: String,
        status: ExitStatus,
        output: Vec<u8>,
    },

    #[error("error reading output of `{command}`: {reason}")]
    Capture {
        command: String,
        reason: String,
        output: Vec<u8>,
    },
}

impl ProcessError {
    /// Output captured before the failure (stdout followed by stderr).
    pub fn output(&self) -> &[u8] {
        match self {
            ProcessError::Failed { output, .. } | ProcessError::Capture { output, .. } => output,
            ProcessError::Spawn { .. } => &[],
        }
    }
}

/// Release workflow failures.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("image tag '{tag}' already exists in {repository}")]
    TagExists { repository: String, tag: String },

    #[error("http request failed: {0}")]
    Http(String),

    #[error("unexpected registry status code: {0}")]
    UnexpectedStatus(u16),

    #[error("failed to test the following hosts: {}", .0.join(", "))]
    Probe(Vec<String>),
}

/// Vendor batch outcome when at least one unit failed.
#[derive(Error, Debug)]
pub enum VendorError {
    #[error("failed to deploy vendors: {}", .0.join(", "))]
    BatchFailed(Vec<String>),
}

/// Result type alias for deployer operations.
pub type Result<T> = std::result::Result<T, Error>;
