use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

use super::{check_max_len, check_not_blank};

const TROVE_MAX_LEN: usize = 350;

/// A trove classifier, e.g. `Programming Language :: Python :: 3`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TroveClassifier {
    pub trove: String,
}

impl TroveClassifier {
    pub fn new(trove: impl Into<String>) -> Self {
        Self {
            trove: trove.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_not_blank("trove", &self.trove)?;
        check_max_len("trove", &self.trove, TROVE_MAX_LEN)
    }
}

impl fmt::Display for TroveClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trove)
    }
}
