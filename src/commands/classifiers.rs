use anyhow::Result;

use crate::{runtime::Runtime, store::IndexStore};

use super::config::IndexConfig;
use super::open_index;

/// List every trove classifier used by a release
#[tracing::instrument(skip(runtime, config))]
pub fn classifiers<R: Runtime>(runtime: R, config: &IndexConfig) -> Result<()> {
    let index = open_index(&runtime, config);
    let classifiers = index.store().classifiers()?;
    if classifiers.is_empty() {
        println!("No classifiers registered.");
        return Ok(());
    }
    for classifier in classifiers {
        println!("{}", classifier);
    }
    Ok(())
}
