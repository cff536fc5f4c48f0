use anyhow::{Context, Result};

use crate::{
    domain::model::{Release, ReleaseKey},
    runtime::Runtime,
};

use super::config::IndexConfig;
use super::open_index;

/// Publish a release and print the rank it was given
#[tracing::instrument(skip(runtime, config, release), fields(release = %release))]
pub fn release_add<R: Runtime>(runtime: R, config: &IndexConfig, release: Release) -> Result<()> {
    let index = open_index(&runtime, config);
    let label = release.to_string();
    let release = index
        .create_release(release)
        .with_context(|| format!("Failed to add release {}", label))?;

    println!("Added release {} (order {})", release, release.order);
    Ok(())
}

/// Hide or unhide a release
#[tracing::instrument(skip(runtime, config))]
pub fn release_hide<R: Runtime>(
    runtime: R,
    config: &IndexConfig,
    key: &ReleaseKey,
    hidden: bool,
) -> Result<()> {
    let index = open_index(&runtime, config);
    let release = index
        .set_hidden(key, hidden)
        .with_context(|| format!("Failed to update release {}", key))?;

    if release.hidden {
        println!("Release {} is now hidden", release);
    } else {
        println!("Release {} is now visible", release);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::package_add;
    use crate::commands::test_support::temp_config;
    use crate::runtime::RealRuntime;
    use crate::store::{IndexStore, JsonStore};

    fn order_of(config: &IndexConfig, version: &str) -> i64 {
        let runtime = RealRuntime;
        JsonStore::new(&runtime, config.root.clone())
            .release(&ReleaseKey::new("foo", version))
            .unwrap()
            .unwrap()
            .order
    }

    #[test]
    fn test_release_add_ranks_releases() {
        let (_dir, config) = temp_config();
        package_add(RealRuntime, &config, "foo").unwrap();
        for version in ["2.0", "2023-01-dev", "1.0"] {
            release_add(RealRuntime, &config, Release::new("foo", version)).unwrap();
        }

        assert_eq!(order_of(&config, "2023-01-dev"), 0);
        assert_eq!(order_of(&config, "1.0"), 1);
        assert_eq!(order_of(&config, "2.0"), 2);
    }

    #[test]
    fn test_release_add_unknown_package() {
        let (_dir, config) = temp_config();
        let err = release_add(RealRuntime, &config, Release::new("ghost", "1.0")).unwrap_err();
        assert!(err.to_string().contains("ghost 1.0"));
    }

    #[test]
    fn test_release_hide_round_trip() {
        let (_dir, config) = temp_config();
        package_add(RealRuntime, &config, "foo").unwrap();
        release_add(RealRuntime, &config, Release::new("foo", "1.0")).unwrap();
        let key = ReleaseKey::new("foo", "1.0");

        release_hide(RealRuntime, &config, &key, true).unwrap();
        let runtime = RealRuntime;
        let store = JsonStore::new(&runtime, config.root.clone());
        assert!(store.release(&key).unwrap().unwrap().hidden);

        release_hide(RealRuntime, &config, &key, false).unwrap();
        assert!(!store.release(&key).unwrap().unwrap().hidden);
    }
}
