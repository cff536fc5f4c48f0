use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IndexError, Result};

use super::{Release, check_max_len, check_not_blank};

const NAME_MAX_LEN: usize = 150;

/// A named project on the index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Package {
    /// Slug: ASCII letters, digits, `-` and `_`.
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Package {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_not_blank("name", &self.name)?;
        check_max_len("name", &self.name, NAME_MAX_LEN)?;
        if let Some(c) = self
            .name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(IndexError::validation(
                "name",
                format!("'{}' is not allowed in a package name", c),
            ));
        }
        Ok(())
    }

    pub fn install_command(&self) -> String {
        format!("pip install {}", self.name)
    }

    /// The release ranked highest by the ordering hook.
    pub fn latest(releases: &[Release]) -> Option<&Release> {
        releases.iter().max_by_key(|r| r.order)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
