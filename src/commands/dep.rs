use anyhow::{Context, Result};

use crate::{
    domain::model::{DependencyKind, ReleaseDependency, ReleaseKey},
    runtime::Runtime,
};

use super::config::IndexConfig;
use super::open_index;

/// Record a requires/provides/obsoletes entry on a release
#[tracing::instrument(skip(runtime, config))]
pub fn dep_add<R: Runtime>(
    runtime: R,
    config: &IndexConfig,
    key: &ReleaseKey,
    kind: DependencyKind,
    name: &str,
    version: Option<String>,
    environment: Option<String>,
) -> Result<()> {
    let index = open_index(&runtime, config);
    let dependency = ReleaseDependency {
        version: version.unwrap_or_default(),
        environment: environment.unwrap_or_default(),
        ..ReleaseDependency::new(key.clone(), kind, name)
    };
    index
        .add_dependency(dependency)
        .with_context(|| format!("Failed to add {} to {}", name, key))?;

    println!("Added {} {} to {}", kind.label(), name, key);
    Ok(())
}
