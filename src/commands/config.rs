use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_DIR_NAME: &str = ".crate-index";

/// Where the index lives and how its pages are addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub root: PathBuf,
    pub base_url: String,
}

impl IndexConfig {
    /// Resolve the configuration from command-line values, falling back to
    /// `~/.crate-index` and [`DEFAULT_BASE_URL`].
    #[tracing::instrument(skip(runtime))]
    pub fn resolve<R: Runtime>(
        runtime: &R,
        root: Option<PathBuf>,
        base_url: Option<String>,
    ) -> Result<Self> {
        let root = match root {
            Some(path) => path,
            None => default_index_root(runtime)?,
        };
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        debug!("Using index root {} at {}", root.display(), base_url);
        Ok(Self { root, base_url })
    }

    /// Returns: `<root>/files`
    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }
}

/// Get the default index root directory
#[tracing::instrument(skip(runtime))]
pub fn default_index_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let home_dir = runtime
        .home_dir()
        .context("Could not find home directory")?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_defaults_from_home_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/user")));

        let config = IndexConfig::resolve(&runtime, None, None).unwrap();
        assert_eq!(config.root, PathBuf::from("/home/user/.crate-index"));
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(
            config.files_dir(),
            PathBuf::from("/home/user/.crate-index/files")
        );
    }

    #[test]
    fn test_explicit_values_skip_home_lookup() {
        // No expectations: the home directory must not be consulted.
        let runtime = MockRuntime::new();
        let config = IndexConfig::resolve(
            &runtime,
            Some(PathBuf::from("/srv/index")),
            Some("https://pypi.example".to_string()),
        )
        .unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/index"));
        assert_eq!(config.base_url, "https://pypi.example");
    }

    #[test]
    fn test_missing_home_dir_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_home_dir().returning(|| None);

        let err = IndexConfig::resolve(&runtime, None, None).unwrap_err();
        assert!(err.to_string().contains("home directory"));
    }
}
