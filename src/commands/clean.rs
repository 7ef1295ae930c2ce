//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Kitchen;

/// Delete the output of `generate`
pub fn run(kitchen: &Kitchen) -> Result<()> {
    if kitchen.public_dir.exists() {
        fs::remove_dir_all(&kitchen.public_dir)?;
        tracing::info!("Deleted: {:?}", kitchen.public_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", kitchen.public_dir);
    }

    Ok(())
}
