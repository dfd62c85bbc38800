//! Application manifest (`package.json`).
//!
//! Only `name` and `version` are consumed; every other key is preserved when
//! the version is bumped.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Three-part numeric version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse `MAJOR.MINOR.PATCH`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidVersion` for anything else.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || ConfigError::InvalidVersion(s.to_string());
        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(invalid().into());
        };
        let num = |p: &str| p.parse::<u64>().map_err(|_| invalid());
        Ok(Self {
            major: num(major)?,
            minor: num(minor)?,
            patch: num(patch)?,
        })
    }

    /// The next patch version.
    pub fn bump_patch(self) -> Self {
        Self {
            patch: self.patch + 1,
            ..self
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A loaded `package.json`.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    data: Map<String, Value>,
    name: String,
    version: String,
}

impl Manifest {
    /// Load `<app_dir>/package.json` and require the given fields.
    ///
    /// `name` is always required; pass `require_version` for workflows that
    /// read the version too. Every missing field is reported together.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed, or if required
    /// fields are absent or not strings.
    pub fn load(app_dir: &Path, require_version: bool) -> Result<Self> {
        let path = app_dir.join(constants::MANIFEST_FILE);
        if !path.is_file() {
            return Err(ConfigError::PathNotFound {
                what: "manifest",
                path,
            }
            .into());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let data: Map<String, Value> =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let mut wanted = vec!["name"];
        if require_version {
            wanted.push("version");
        }
        let missing: Vec<String> = wanted
            .iter()
            .filter(|field| !matches!(data.get(**field), Some(Value::String(_))))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields {
                path,
                fields: missing,
            }
            .into());
        }

        let text = |field: &str| {
            data.get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let name = text("name");
        let version = text("version");
        debug!(name = %name, version = %version, "read manifest");

        Ok(Self {
            path,
            data,
            name,
            version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Increment the patch version and rewrite the file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidVersion` if the current version is not
    /// `MAJOR.MINOR.PATCH`, or a write error.
    pub fn bump_patch(&mut self) -> Result<Version> {
        let next = Version::parse(&self.version)?.bump_patch();
        self.version = next.to_string();
        self.data
            .insert("version".to_string(), Value::String(self.version.clone()));

        let contents = serde_json::to_string_pretty(&self.data).map_err(|e| ConfigError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.path, contents).map_err(|source| ConfigError::WriteFile {
            path: self.path.clone(),
            source,
        })?;

        info!("version bumped to {}", next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, contents: &str) {
        fs::write(dir.path().join(constants::MANIFEST_FILE), contents).unwrap();
    }

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version { major: 1, minor: 2, patch: 3 });
        assert_eq!(v.bump_patch().to_string(), "1.2.4");
    }

    #[test]
    fn test_version_parse_invalid() {
        for bad in ["1.2", "1.2.3.4", "a.b.c", "", "1..3", "1.2.-3"] {
            assert!(Version::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_load_name_only() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, r#"{"name": "web"}"#);
        let m = Manifest::load(dir.path(), false).unwrap();
        assert_eq!(m.name(), "web");
    }

    #[test]
    fn test_load_reports_all_missing() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, r#"{"private": true}"#);
        match Manifest::load(dir.path(), true).unwrap_err() {
            Error::Config(ConfigError::MissingFields { fields, .. }) => {
                assert_eq!(fields, vec!["name", "version"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::load(dir.path(), false).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::PathNotFound { .. })));
    }

    #[test]
    fn test_bump_patch_preserves_fields() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            &dir,
            r#"{"name": "web", "version": "0.9.9", "scripts": {"start": "node ."}}"#,
        );

        let mut m = Manifest::load(dir.path(), true).unwrap();
        let next = m.bump_patch().unwrap();
        assert_eq!(next.to_string(), "0.9.10");

        let raw = fs::read_to_string(dir.path().join(constants::MANIFEST_FILE)).unwrap();
        let reloaded = Manifest::load(dir.path(), true).unwrap();
        assert_eq!(reloaded.version(), "0.9.10");
        assert!(raw.contains("\"start\": \"node .\""));
        assert!(raw.starts_with("{\n  \"name\""));
    }

    #[test]
    fn test_bump_rejects_malformed_version() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, r#"{"name": "web", "version": "latest"}"#);
        let mut m = Manifest::load(dir.path(), true).unwrap();
        assert!(m.bump_patch().is_err());
    }
}
