//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::Site;

/// Delete the output directory.
pub fn run(site: &Site) -> Result<()> {
    if site.output_dir.exists() {
        fs::remove_dir_all(&site.output_dir)?;
        tracing::info!("Deleted: {:?}", site.output_dir);
    }

    Ok(())
}
