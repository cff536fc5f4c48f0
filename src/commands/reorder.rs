use anyhow::{Context, Result};
use log::info;

use crate::{runtime::Runtime, store::IndexStore};

use super::config::IndexConfig;
use super::open_index;

/// Recompute release ranks for one package, or for every package
#[tracing::instrument(skip(runtime, config))]
pub fn reorder<R: Runtime>(runtime: R, config: &IndexConfig, package: Option<&str>) -> Result<()> {
    let index = open_index(&runtime, config);
    let names = match package {
        Some(name) => vec![name.to_string()],
        None => index
            .store()
            .packages()?
            .into_iter()
            .map(|p| p.name)
            .collect(),
    };

    let mut total = 0;
    for name in &names {
        let changed = index
            .reorder(name)
            .with_context(|| format!("Failed to reorder {}", name))?;
        if changed > 0 {
            println!("{}: {} release(s) reordered", name, changed);
        }
        total += changed;
    }

    info!("Reordered {} release(s) across {} package(s)", total, names.len());
    if total == 0 {
        println!("All releases already in order.");
    }
    Ok(())
}
