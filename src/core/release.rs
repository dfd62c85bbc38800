//! Release workflow.
//!
//! Checks the registry for the manifest version, builds, scans and pushes
//! the image, records the version in the descriptor, then bumps the
//! manifest's patch version for the next release.

use std::path::PathBuf;

use tracing::info;
use zeroize::Zeroizing;

use crate::core::deploy::require_dir;
use crate::core::descriptor::ReleaseDescriptor;
use crate::core::image::ImagePipeline;
use crate::core::manifest::{Manifest, Version};
use crate::core::registry::TagLookup;
use crate::error::{ConfigError, ReleaseError, Result};

/// Inputs for one release.
pub struct ReleaseRequest {
    pub app_dir: PathBuf,
    pub ops_dir: PathBuf,
    pub username: String,
    pub password: Zeroizing<String>,
}

impl ReleaseRequest {
    /// Both credentials must be non-empty.
    pub fn check_credentials(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing).into());
        }
        Ok(())
    }
}

/// Released image and the manifest version prepared for next time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub image: String,
    pub released_version: String,
    pub next_version: String,
}

/// Run the release workflow.
///
/// # Errors
///
/// Fails before any build if the directory, credentials, manifest or its
/// version are invalid or the tag already exists; afterwards on the first failing step.
pub fn run(req: &ReleaseRequest, registry: &dyn TagLookup, images: &ImagePipeline<'_>) -> Result<ReleaseOutcome> {
    info!("starting release process for application in directory: {}", req.app_dir.display());
    require_dir("application directory", &req.app_dir)?;
    req.check_credentials()?;

    let mut manifest = Manifest::load(&req.app_dir, true)?;
    let app_name = manifest.name().to_string();
    let version = manifest.version().to_string();
    // A malformed version must fail before anything is built or pushed.
    Version::parse(&version)?;
    info!("read manifest: name={}, version={}", app_name, version);

    let descriptor_path = ReleaseDescriptor::path(&req.ops_dir, &app_name);
    if !descriptor_path.is_file() {
        return Err(ConfigError::PathNotFound {
            what: "file",
            path: descriptor_path,
        }
        .into());
    }

    let repository = format!("{}/{}", req.username, app_name);
    let image = format!("{}:{}", repository, version);

    info!("checking if image tag '{}' already exists", version);
    if registry.tag_exists(&repository, &version)? {
        return Err(ReleaseError::TagExists {
            repository,
            tag: version,
        }
        .into());
    }

    images.build(&req.app_dir, &image)?;
    images.scan(&image)?;
    images.push(&image)?;

    ReleaseDescriptor::record_release(&req.ops_dir, &app_name, &version)?;
    info!("updated {} with latestReleaseVersion={}", descriptor_path.display(), version);

    let next = manifest.bump_patch()?;
    info!("release process completed for version {}", version);

    Ok(ReleaseOutcome {
        image,
        released_version: version,
        next_version: next.to_string(),
    })
}
