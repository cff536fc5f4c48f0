use anyhow::{Context, Result};
use log::debug;

use crate::runtime::Runtime;

use super::config::IndexConfig;
use super::open_index;

/// Register a new package
#[tracing::instrument(skip(runtime, config))]
pub fn package_add<R: Runtime>(runtime: R, config: &IndexConfig, name: &str) -> Result<()> {
    debug!("Adding package {} under {}", name, config.root.display());
    let index = open_index(&runtime, config);
    let package = index
        .create_package(name)
        .with_context(|| format!("Failed to add package {}", name))?;

    println!("Added package {}", package);
    println!("  {}", index.urls().package_detail(&package.name));
    Ok(())
}
