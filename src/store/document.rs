use serde::{Deserialize, Serialize};

use crate::domain::model::{Package, Release, ReleaseDependency, ReleaseFile, ReleaseKey};
use crate::error::{IndexError, Result};

/// Everything stored for one package: the package row and its releases
/// with their files and dependency rows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PackageDocument {
    pub package: Package,
    #[serde(default)]
    pub releases: Vec<ReleaseRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ReleaseRecord {
    pub release: Release,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ReleaseFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ReleaseDependency>,
}

impl PackageDocument {
    pub fn new(package: Package) -> Self {
        Self {
            package,
            releases: Vec::new(),
        }
    }

    fn not_found(&self, version: &str) -> IndexError {
        IndexError::ReleaseNotFound {
            package: self.package.name.clone(),
            version: version.to_string(),
        }
    }

    pub fn record(&self, version: &str) -> Option<&ReleaseRecord> {
        self.releases.iter().find(|r| r.release.version == version)
    }

    fn record_mut(&mut self, version: &str) -> Result<&mut ReleaseRecord> {
        match self
            .releases
            .iter()
            .position(|r| r.release.version == version)
        {
            Some(index) => Ok(&mut self.releases[index]),
            None => Err(self.not_found(version)),
        }
    }

    pub fn releases(&self) -> Vec<Release> {
        self.releases.iter().map(|r| r.release.clone()).collect()
    }

    pub fn files(&self) -> Vec<ReleaseFile> {
        self.releases
            .iter()
            .flat_map(|r| r.files.iter().cloned())
            .collect()
    }

    pub fn insert_release(&mut self, release: &Release) -> Result<()> {
        if self.record(&release.version).is_some() {
            return Err(IndexError::ReleaseExists {
                package: self.package.name.clone(),
                version: release.version.clone(),
            });
        }
        self.releases.push(ReleaseRecord {
            release: release.clone(),
            ..Default::default()
        });
        Ok(())
    }

    pub fn update_release(&mut self, release: &Release) -> Result<()> {
        let record = self.record_mut(&release.version)?;
        let order = record.release.order;
        let created = record.release.created;
        record.release = Release {
            order,
            created,
            ..release.clone()
        };
        Ok(())
    }

    pub fn set_order(&mut self, version: &str, order: i64) -> Result<()> {
        self.record_mut(version)?.release.order = order;
        Ok(())
    }

    pub fn insert_file(&mut self, file: &ReleaseFile) -> Result<()> {
        let record = self.record_mut(&file.release.version)?;
        if record.files.iter().any(|f| f.conflicts_with(file)) {
            return Err(IndexError::ReleaseFileExists {
                release: file.release.to_string(),
                file_type: file.file_type.to_string(),
                python_version: file.python_version.clone(),
                filename: file.display_name().to_string(),
            });
        }
        record.files.push(file.clone());
        Ok(())
    }

    pub fn increment_downloads(&mut self, key: &ReleaseKey, filename: &str) -> Result<u64> {
        let record = self.record_mut(&key.version)?;
        let file = record
            .files
            .iter_mut()
            .find(|f| f.display_name() == filename)
            .ok_or_else(|| IndexError::ReleaseFileNotFound {
                release: key.to_string(),
                filename: filename.to_string(),
            })?;
        file.downloads += 1;
        Ok(file.downloads)
    }

    pub fn insert_dependency(&mut self, dependency: &ReleaseDependency) -> Result<()> {
        self.record_mut(&dependency.release.version)?
            .dependencies
            .push(dependency.clone());
        Ok(())
    }
}
