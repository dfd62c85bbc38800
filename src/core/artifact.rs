//! Secured temporary values files.
//!
//! A [`ValuesArtifact`] is a private copy of a values template living in a
//! volatile scratch directory. It is written owner-only (0600), then
//! explicitly chowned to the real user of the process, and removed when the
//! artifact is dropped, so every exit path of the owning operation cleans it
//! up.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use nix::unistd::{chown, getuid, User};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ArtifactError, ConfigError, Result};

/// A uniquely named, owner-only copy of a values template.
#[derive(Debug)]
pub struct ValuesArtifact {
    path: PathBuf,
}

impl ValuesArtifact {
    /// Copy `template` into a new artifact under `scratch_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be read, the artifact cannot
    /// be written, or ownership cannot be transferred to the current user.
    pub fn from_template(scratch_dir: &Path, template: &Path) -> Result<Self> {
        let bytes = fs::read(template).map_err(|source| ConfigError::ReadFile {
            path: template.to_path_buf(),
            source,
        })?;
        Self::create(scratch_dir, &bytes)
    }

    /// Write `contents` into a new artifact under `scratch_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError` on write, user lookup, or chown failure. A
    /// partially created file is removed before returning.
    pub fn create(scratch_dir: &Path, contents: &[u8]) -> Result<Self> {
        let path = scratch_dir.join(format!("{}.yaml", Uuid::new_v4()));
        debug!(path = %path.display(), "creating values artifact");

        // From here on the guard owns the path, so a failed chown still removes it.
        let artifact = Self { path };
        write_private(&artifact.path, contents)?;
        chown_to_current_user(&artifact.path)?;

        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ValuesArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed values artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove values artifact"),
        }
    }
}

/// Create `path` with mode 0600 and write `contents`.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let to_err = |source: std::io::Error| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .mode(0o600)
        .open(path)
        .map_err(to_err)?;
    file.write_all(contents).map_err(to_err)?;
    file.flush().map_err(to_err)?;

    // Exact mode regardless of umask.
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(to_err)?;

    Ok(())
}

/// Set owner and group of `path` to the real user of this process.
fn chown_to_current_user(path: &Path) -> Result<()> {
    let uid = getuid();
    let user = User::from_uid(uid)
        .map_err(|e| ArtifactError::UnknownUser(e.to_string()))?
        .ok_or_else(|| ArtifactError::UnknownUser(format!("no passwd entry for uid {}", uid)))?;

    chown(path, Some(user.uid), Some(user.gid)).map_err(|source| ArtifactError::Chown {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), user = %user.name, "artifact ownership set");
    Ok(())
}
