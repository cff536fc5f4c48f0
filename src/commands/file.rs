use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;

use crate::{
    domain::model::{FileType, ReleaseFile, ReleaseKey},
    runtime::Runtime,
    store::IndexStore,
};

use super::config::IndexConfig;
use super::{open_index, open_storage};

/// Options for attaching an artifact to a release.
#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    pub python_version: Option<String>,
    /// Name shown to users; defaults to the source's base name.
    pub filename: Option<String>,
    pub comment: Option<String>,
}

/// Copy an artifact into the index and attach it to a release
#[tracing::instrument(skip(runtime, config, options))]
pub fn file_add<R: Runtime>(
    runtime: R,
    config: &IndexConfig,
    key: &ReleaseKey,
    file_type: FileType,
    source: &Path,
    options: FileOptions,
) -> Result<()> {
    let index = open_index(&runtime, config);
    let storage = open_storage(&runtime, config);

    let stored = storage
        .store(source)
        .with_context(|| format!("Failed to store {}", source.display()))?;
    debug!("Stored {} as {}", source.display(), stored.path);

    let python_version = options.python_version.unwrap_or_else(|| match file_type {
        FileType::Sdist => "source".to_string(),
        _ => "any".to_string(),
    });
    let filename = options.filename.or_else(|| {
        source
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
    });
    let file = ReleaseFile {
        filename,
        comment: options.comment.unwrap_or_default(),
        ..ReleaseFile::new(
            key.clone(),
            file_type,
            stored.path.as_str(),
            stored.digest.as_str(),
            python_version,
        )
    };

    let file = match index.add_release_file(file) {
        Ok(file) => file,
        Err(e) => {
            let copied = storage.resolve(&stored.path);
            if let Err(cleanup) = runtime.remove_file(&copied) {
                warn!("Failed to remove {}: {}", copied.display(), cleanup);
            }
            return Err(e).with_context(|| format!("Failed to add file to {}", key));
        }
    };

    println!("Added {} to {}", file.display_name(), key);
    println!("  sha256: {}", file.digest);
    Ok(())
}

/// Count a download and print where the artifact lives
#[tracing::instrument(skip(runtime, config))]
pub fn file_download<R: Runtime>(
    runtime: R,
    config: &IndexConfig,
    key: &ReleaseKey,
    filename: &str,
) -> Result<()> {
    let index = open_index(&runtime, config);
    let downloads = index
        .record_download(key, filename)
        .with_context(|| format!("Failed to record download of {}", filename))?;

    let file = index
        .store()
        .release_files(key)?
        .into_iter()
        .find(|f| f.display_name() == filename)
        .with_context(|| format!("File {} disappeared from {}", filename, key))?;
    let path = open_storage(&runtime, config).resolve(&file.file);

    println!("{}", path.display());
    println!("  downloads: {}", downloads);
    Ok(())
}
