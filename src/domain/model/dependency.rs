use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IndexError, Result};

use super::{ReleaseKey, check_max_len, check_not_blank};

const NAME_MAX_LEN: usize = 150;
const VERSION_MAX_LEN: usize = 50;

/// Which side of a release's metadata a dependency row describes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Requires,
    Provides,
    Obsoletes,
}

/// Metadata field a dependency row came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Requires,
    RequiresDist,
    External,
    Provides,
    ProvidesDist,
    Obsoletes,
    ObsoletesDist,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 7] = [
        DependencyKind::Requires,
        DependencyKind::RequiresDist,
        DependencyKind::External,
        DependencyKind::Provides,
        DependencyKind::ProvidesDist,
        DependencyKind::Obsoletes,
        DependencyKind::ObsoletesDist,
    ];

    pub fn relation(&self) -> Relation {
        match self {
            DependencyKind::Requires | DependencyKind::RequiresDist | DependencyKind::External => {
                Relation::Requires
            }
            DependencyKind::Provides | DependencyKind::ProvidesDist => Relation::Provides,
            DependencyKind::Obsoletes | DependencyKind::ObsoletesDist => Relation::Obsoletes,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Requires => "requires",
            DependencyKind::RequiresDist => "requires_dist",
            DependencyKind::External => "external",
            DependencyKind::Provides => "provides",
            DependencyKind::ProvidesDist => "provides_dist",
            DependencyKind::Obsoletes => "obsoletes",
            DependencyKind::ObsoletesDist => "obsoletes_dist",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Requires => "Requirement",
            DependencyKind::RequiresDist => "Dist Requirement",
            DependencyKind::External => "External Requirement",
            DependencyKind::Provides => "Provides",
            DependencyKind::ProvidesDist => "Dist Provides",
            DependencyKind::Obsoletes => "Obsoletes",
            DependencyKind::ObsoletesDist => "Dist Obsoletes",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        DependencyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| IndexError::validation("kind", format!("unknown dependency kind '{}'", s)))
    }
}

/// A requires/provides/obsoletes row of a release.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDependency {
    pub release: ReleaseKey,
    pub kind: DependencyKind,
    pub name: String,
    /// Version specifier, e.g. `>=1.0`.
    #[serde(default)]
    pub version: String,
    /// Environment marker, e.g. `python_version < "3"`.
    #[serde(default)]
    pub environment: String,
}

impl ReleaseDependency {
    pub fn new(release: ReleaseKey, kind: DependencyKind, name: impl Into<String>) -> Self {
        Self {
            release,
            kind,
            name: name.into(),
            version: String::new(),
            environment: String::new(),
        }
    }

    pub fn relation(&self) -> Relation {
        self.kind.relation()
    }

    pub fn validate(&self) -> Result<()> {
        check_not_blank("name", &self.name)?;
        check_max_len("name", &self.name, NAME_MAX_LEN)?;
        check_max_len("version", &self.version, VERSION_MAX_LEN)
    }
}

impl fmt::Display for ReleaseDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
