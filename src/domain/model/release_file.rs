use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{IndexError, Result};

use super::{ReleaseKey, check_max_len, check_not_blank};

const FILE_MAX_LEN: usize = 512;
const FILENAME_MAX_LEN: usize = 200;
const DIGEST_MAX_LEN: usize = 512;
const PYTHON_VERSION_MAX_LEN: usize = 25;

/// Distribution format of an uploaded file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Sdist,
    BdistEgg,
    BdistMsi,
    BdistDmg,
    BdistRpm,
    BdistDumb,
    BdistWininst,
}

impl FileType {
    pub const ALL: [FileType; 7] = [
        FileType::Sdist,
        FileType::BdistEgg,
        FileType::BdistMsi,
        FileType::BdistDmg,
        FileType::BdistRpm,
        FileType::BdistDumb,
        FileType::BdistWininst,
    ];

    /// Stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Sdist => "sdist",
            FileType::BdistEgg => "bdist_egg",
            FileType::BdistMsi => "bdist_msi",
            FileType::BdistDmg => "bdist_dmg",
            FileType::BdistRpm => "bdist_rpm",
            FileType::BdistDumb => "bdist_dumb",
            FileType::BdistWininst => "bdist_wininst",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FileType::Sdist => "Source",
            FileType::BdistEgg => "Egg",
            FileType::BdistMsi => "MSI",
            FileType::BdistDmg => "DMG",
            FileType::BdistRpm => "RPM",
            FileType::BdistDumb => "bdist_dumb",
            FileType::BdistWininst => "bdist_wininst",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        FileType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| IndexError::validation("type", format!("unknown file type '{}'", s)))
    }
}

/// A downloadable artifact attached to a release.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReleaseFile {
    pub release: ReleaseKey,
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// Path of the stored artifact, relative to the storage root.
    pub file: String,
    /// Name of the file as given by the uploader.
    #[serde(default)]
    pub filename: Option<String>,
    pub digest: String,
    pub python_version: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub comment: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl ReleaseFile {
    pub fn new(
        release: ReleaseKey,
        file_type: FileType,
        file: impl Into<String>,
        digest: impl Into<String>,
        python_version: impl Into<String>,
    ) -> Self {
        Self {
            release,
            file_type,
            file: file.into(),
            filename: None,
            digest: digest.into(),
            python_version: python_version.into(),
            downloads: 0,
            comment: String::new(),
            created: DateTime::<Utc>::default(),
            modified: DateTime::<Utc>::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_not_blank("file", &self.file)?;
        check_max_len("file", &self.file, FILE_MAX_LEN)?;
        if let Some(filename) = &self.filename {
            check_max_len("filename", filename, FILENAME_MAX_LEN)?;
        }
        check_max_len("digest", &self.digest, DIGEST_MAX_LEN)?;
        check_max_len(
            "python_version",
            &self.python_version,
            PYTHON_VERSION_MAX_LEN,
        )
    }

    /// Base name of the stored file.
    pub fn basename(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.file)
    }

    /// The uploader's file name, falling back to the stored base name.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or_else(|| self.basename())
    }

    /// Python version for display; source distributions show nothing.
    pub fn python_version_display(&self) -> &str {
        if self.python_version.eq_ignore_ascii_case("source") {
            ""
        } else {
            &self.python_version
        }
    }

    /// Whether both rows would violate the (release, type, python_version,
    /// filename) unique constraint. Missing filenames never collide.
    pub fn conflicts_with(&self, other: &ReleaseFile) -> bool {
        self.release == other.release
            && self.file_type == other.file_type
            && self.python_version == other.python_version
            && self.filename.is_some()
            && self.filename == other.filename
    }
}

impl fmt::Display for ReleaseFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.basename())
    }
}
