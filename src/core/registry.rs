//! Image registry lookups.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{ReleaseError, Result};

/// Tag existence check against a registry API.
pub trait TagLookup {
    /// Whether `repository:tag` already exists.
    fn tag_exists(&self, repository: &str, tag: &str) -> Result<bool>;
}

/// Docker Hub v2 repository API with basic auth.
pub struct DockerHub {
    base_url: String,
    username: String,
    token: Zeroizing<String>,
    client: reqwest::blocking::Client,
}

impl DockerHub {
    /// # Errors
    ///
    /// Returns `ReleaseError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str, username: &str, token: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ReleaseError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            token: Zeroizing::new(token.to_string()),
            client,
        })
    }

    fn tag_url(&self, repository: &str, tag: &str) -> String {
        format!("{}/v2/repositories/{}/tags/{}", self.base_url, repository, tag)
    }
}

impl TagLookup for DockerHub {
    fn tag_exists(&self, repository: &str, tag: &str) -> Result<bool> {
        let url = self.tag_url(repository, tag);
        debug!(url = %url, "checking registry tag");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(self.token.as_str()))
            .send()
            .map_err(|e| ReleaseError::Http(e.to_string()))?;

        interpret_status(response.status())
    }
}

/// 200 means present, 404 absent, anything else is an error.
fn interpret_status(status: StatusCode) -> Result<bool> {
    match status {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        other => Err(ReleaseError::UnexpectedStatus(other.as_u16()).into()),
    }
}
