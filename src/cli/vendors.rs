//! Vendors command.

use std::path::Path;

use crate::cli::output;
use crate::core::env::ProcessEnv;
use crate::core::settings::{Settings, TargetEnvironment};
use crate::core::vendors::{UnitKind, VendorDeployer};
use crate::error::Result;

/// Deploy every vendor unit and print a per-unit summary.
pub fn deploy(settings: &Settings, infra_dir: &Path, environment: &str) -> Result<()> {
    let environment: TargetEnvironment = environment.parse()?;

    let report = VendorDeployer::new(settings, &ProcessEnv)
        .deploy(infra_dir, environment)
        .map_err(|e| e.context("error running vendors deploy process"))?;

    output::header(&format!("vendors ({})", environment));
    for unit in &report.units {
        let label = match unit.kind {
            UnitKind::Script => format!("{} (script)", unit.name),
            UnitKind::Chart => format!("{} (chart)", unit.name),
        };
        match unit.error() {
            None => output::ok_item(&label),
            Some(e) => output::failed_item(&label, e),
        }
    }

    report.into_result()
}
