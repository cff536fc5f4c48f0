use anyhow::Result;
use log::{debug, warn};

use crate::{domain::model::Package, runtime::Runtime, store::IndexStore};

use super::config::IndexConfig;
use super::open_index;

/// List all packages with their latest release
#[tracing::instrument(skip(runtime, config))]
pub fn list<R: Runtime>(runtime: R, config: &IndexConfig) -> Result<()> {
    debug!("Listing packages from {:?}", config.root);
    let index = open_index(&runtime, config);

    let packages = index.store().packages()?;
    if packages.is_empty() {
        println!("No packages found.");
        return Ok(());
    }

    debug!("Found {} package(s)", packages.len());

    for package in packages {
        let releases = match index.store().releases(&package.name) {
            Ok(releases) => releases,
            Err(e) => {
                warn!("Failed to load releases of {}: {}", package, e);
                continue;
            }
        };
        let version = Package::latest(&releases)
            .map(|r| r.version.clone())
            .unwrap_or_else(|| "(no releases)".to_string());
        let downloads = index.package_downloads(&package.name)?;
        println!("{} {} ({} downloads)", package, version, downloads);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::temp_config;
    use crate::commands::{package_add, release_add};
    use crate::domain::model::Release;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn test_list_no_packages() {
        let mut runtime = MockRuntime::new();
        let packages_dir = PathBuf::from("/srv/index/packages");
        runtime
            .expect_exists()
            .with(eq(packages_dir))
            .returning(|_| false);

        let config = IndexConfig {
            root: PathBuf::from("/srv/index"),
            base_url: "http://localhost:8000".to_string(),
        };
        assert!(list(runtime, &config).is_ok());
    }

    #[test]
    fn test_list_with_packages() {
        let (_dir, config) = temp_config();
        package_add(RealRuntime, &config, "foo").unwrap();
        package_add(RealRuntime, &config, "bar").unwrap();
        release_add(RealRuntime, &config, Release::new("foo", "1.0")).unwrap();
        assert!(list(RealRuntime, &config).is_ok());
    }
}
