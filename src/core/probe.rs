//! Post-deploy functional check.
//!
//! Issues `GET http://<host>/<endpoint>` and requires a 200 response.

use std::path::Path;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tracing::{error, info};

use crate::core::deploy::require_dir;
use crate::core::manifest::Manifest;
use crate::error::{ReleaseError, Result};

/// URL probed for `host` and `endpoint`.
pub fn endpoint_url(host: &str, endpoint: &str) -> String {
    format!("http://{}/{}", host, endpoint.trim_start_matches('/'))
}

/// Probe `endpoint` on every host, reporting all failing hosts together.
///
/// # Errors
///
/// Configuration errors for the application directory or manifest, or
/// `ReleaseError::Probe` naming the hosts that did not answer 200.
pub fn run(app_dir: &Path, hosts: &[String], endpoint: &str) -> Result<()> {
    require_dir("application directory", app_dir)?;
    let manifest = Manifest::load(app_dir, false)?;
    info!("testing application: {}", manifest.name());

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| ReleaseError::Http(e.to_string()))?;

    let mut failed = Vec::new();
    for host in hosts {
        let url = endpoint_url(host, endpoint);
        info!("testing endpoint: {}", url);

        match check(&client, &url) {
            Ok(body) => info!("response: {}", body),
            Err(reason) => {
                error!("{}: {}", url, reason);
                failed.push(host.clone());
            }
        }
    }

    if !failed.is_empty() {
        return Err(ReleaseError::Probe(failed).into());
    }
    info!("all tests passed");
    Ok(())
}

fn check(client: &reqwest::blocking::Client, url: &str) -> std::result::Result<String, String> {
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .map_err(|e| format!("error sending HTTP request: {}", e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(format!("non-200 status code: {}", status.as_u16()));
    }
    response
        .text()
        .map_err(|e| format!("error reading HTTP response: {}", e))
}
