//! Artifact storage for release files.

use log::{debug, info};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};
use crate::runtime::Runtime;

/// Directory, relative to the storage root, that uploads are placed in.
pub const UPLOAD_TO: &str = "packages";

/// Result of storing an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path relative to the storage root, e.g. `packages/foo-1.0.tar.gz`.
    pub path: String,
    /// Lowercase hex SHA-256 of the content.
    pub digest: String,
}

/// Copies release artifacts under `<root>/packages/`.
pub struct FileStorage<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> FileStorage<'a, R> {
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored path.
    pub fn resolve(&self, stored: &str) -> PathBuf {
        self.root.join(stored)
    }

    /// Copy `source` into the upload directory under its own base name.
    ///
    /// An existing file with the same name is never overwritten.
    #[tracing::instrument(skip(self))]
    pub fn store(&self, source: &Path) -> Result<StoredFile> {
        let basename = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                IndexError::validation("file", format!("{} has no file name", source.display()))
            })?;

        let relative = format!("{}/{}", UPLOAD_TO, basename);
        let target = self.resolve(&relative);
        if self.runtime.exists(&target) {
            return Err(IndexError::validation(
                "file",
                format!("{} is already stored", relative),
            ));
        }

        let upload_dir = self.root.join(UPLOAD_TO);
        if !self.runtime.is_dir(&upload_dir) {
            debug!("Creating upload directory {}", upload_dir.display());
            self.runtime.create_dir_all(&upload_dir)?;
        }

        let digest = self.digest(source)?;
        let bytes = self.runtime.copy(source, &target)?;
        info!("Stored {} ({} bytes)", relative, bytes);

        Ok(StoredFile {
            path: relative,
            digest,
        })
    }

    /// SHA-256 of a file, as lowercase hex.
    pub fn digest(&self, path: &Path) -> Result<String> {
        let mut reader = self.runtime.open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(hex::encode(hasher.finalize()))
    }
}
