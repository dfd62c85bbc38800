//! Version command.

use crate::error::Result;

/// Print the deployer version.
pub fn execute() -> Result<()> {
    println!("deployer version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
