use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::version::Normalize;

use super::{TroveClassifier, check_max_len, check_not_blank};

const VERSION_MAX_LEN: usize = 512;
const REQUIRES_PYTHON_MAX_LEN: usize = 25;
const DOWNLOAD_URI_MAX_LEN: usize = 1024;

/// Identifies a release: unique per (package, version).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ReleaseKey {
    pub package: String,
    pub version: String,
}

impl ReleaseKey {
    pub fn new(package: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ReleaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.package, self.version)
    }
}

/// One published version of a package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Release {
    pub package: String,
    pub version: String,
    #[serde(default)]
    pub hidden: bool,
    /// Rank among the package's releases; only the ordering hook writes it.
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub maintainer: String,
    #[serde(default)]
    pub maintainer_email: String,
    #[serde(default)]
    pub requires_python: String,
    #[serde(default)]
    pub download_uri: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub uris: BTreeMap<String, String>,
    /// Trove classifier strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifiers: Vec<String>,
    #[serde(default)]
    pub raw_data: Option<serde_json::Value>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Release {
    pub fn new(package: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> ReleaseKey {
        ReleaseKey::new(&self.package, &self.version)
    }

    pub fn validate(&self) -> Result<()> {
        check_not_blank("version", &self.version)?;
        check_max_len("version", &self.version, VERSION_MAX_LEN)?;
        check_max_len(
            "requires_python",
            &self.requires_python,
            REQUIRES_PYTHON_MAX_LEN,
        )?;
        check_max_len("download_uri", &self.download_uri, DOWNLOAD_URI_MAX_LEN)?;
        for trove in &self.classifiers {
            TroveClassifier::new(trove.as_str()).validate()?;
        }
        Ok(())
    }

    pub fn install_command(&self) -> String {
        format!("pip install {}=={}", self.package, self.version)
    }

    pub fn requirement_line<N: Normalize + ?Sized>(&self, normalizer: &N) -> String {
        requirement_line(&self.package, &self.version, normalizer)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.package, self.version)
    }
}

/// Suggested requirement for depending on `package` at `version`.
///
/// Rational versions get a range up to the next minor release
/// (`foo>=1.4.2,<1.5`); anything else is pinned exactly.
pub fn requirement_line<N: Normalize + ?Sized>(
    package: &str,
    version: &str,
    normalizer: &N,
) -> String {
    let upper = normalizer
        .normalize(version)
        .and_then(|n| Some((n.major(), n.minor().checked_add(1)?)));
    match upper {
        Some((major, minor)) => format!("{}>={},<{}.{}", package, version, major, minor),
        None => format!("{}=={}", package, version),
    }
}
