use log::{debug, info};
use std::rc::Rc;

use crate::domain::model::{Package, Release, ReleaseDependency, ReleaseFile, ReleaseKey};
use crate::error::{IndexError, Result};
use crate::runtime::Runtime;
use crate::store::IndexStore;
use crate::urls::UrlResolver;
use crate::version::{Normalize, Verlib};

use super::ordering::VersionOrdering;
use super::signals::{PostSave, ReleaseReceiver, Signals};

/// Read-only view of a package and its derived properties.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSummary {
    pub package: Package,
    pub url: String,
    pub downloads: u64,
    pub install_command: String,
    pub latest: Option<Release>,
    /// `None` when the package has no release yet.
    pub requirement_line: Option<String>,
    /// Highest `order` first.
    pub releases: Vec<ReleaseSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSummary {
    pub release: Release,
    pub downloads: u64,
    pub install_command: String,
    pub requirement_line: String,
    pub files: Vec<ReleaseFile>,
    pub dependencies: Vec<ReleaseDependency>,
}

/// Write path of the index.
///
/// Every mutation goes through here so that timestamps, validation and the
/// post-save hooks are applied the same way regardless of the store.
pub struct IndexService<'a, R: Runtime, S: IndexStore> {
    runtime: &'a R,
    store: S,
    normalizer: Rc<dyn Normalize>,
    signals: Signals,
    urls: UrlResolver,
}

impl<'a, R: Runtime, S: IndexStore> IndexService<'a, R, S> {
    /// Service using [`Verlib`] normalization.
    pub fn new(runtime: &'a R, store: S, urls: UrlResolver) -> Self {
        Self::with_normalizer(runtime, store, urls, Rc::new(Verlib))
    }

    /// Service with a custom normalizer. [`VersionOrdering`] is connected to
    /// the post-save signal with the same normalizer.
    pub fn with_normalizer(
        runtime: &'a R,
        store: S,
        urls: UrlResolver,
        normalizer: Rc<dyn Normalize>,
    ) -> Self {
        let mut signals = Signals::new();
        signals.connect(Box::new(VersionOrdering::new(Rc::clone(&normalizer))));
        Self {
            runtime,
            store,
            normalizer,
            signals,
            urls,
        }
    }

    /// Attach another post-save receiver after the built-in ones.
    pub fn connect(&mut self, receiver: Box<dyn ReleaseReceiver>) {
        self.signals.connect(receiver);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn urls(&self) -> &UrlResolver {
        &self.urls
    }

    #[tracing::instrument(skip(self))]
    pub fn create_package(&self, name: &str) -> Result<Package> {
        let package = Package::new(name, self.runtime.now());
        package.validate()?;
        self.store.insert_package(&package)?;
        info!("Created package {}", package);
        Ok(package)
    }

    fn require_package(&self, name: &str) -> Result<Package> {
        self.store
            .package(name)?
            .ok_or_else(|| IndexError::PackageNotFound(name.to_string()))
    }

    fn require_release(&self, key: &ReleaseKey) -> Result<Release> {
        self.store
            .release(key)?
            .ok_or_else(|| IndexError::ReleaseNotFound {
                package: key.package.clone(),
                version: key.version.clone(),
            })
    }

    /// Insert a new release and re-rank its package.
    ///
    /// The stored `order` is ignored on input; the returned release carries
    /// the rank assigned by the ordering hook.
    #[tracing::instrument(skip(self, release), fields(release = %release))]
    pub fn create_release(&self, release: Release) -> Result<Release> {
        self.require_package(&release.package)?;
        release.validate()?;

        let now = self.runtime.now();
        let release = Release {
            order: 0,
            created: now,
            modified: now,
            ..release
        };
        self.store.insert_release(&release)?;
        self.register_classifiers(&release)?;
        info!("Created release {}", release);

        let key = release.key();
        self.signals.send(
            &self.store,
            &PostSave {
                release: key.clone(),
                created: true,
            },
        )?;
        self.require_release(&key)
    }

    /// Update the metadata of an existing release.
    ///
    /// The post-save signal fires with `created = false`, so ranks are left
    /// untouched.
    #[tracing::instrument(skip(self, release), fields(release = %release))]
    pub fn save_release(&self, release: Release) -> Result<Release> {
        let key = release.key();
        self.require_release(&key)?;
        release.validate()?;

        let release = Release {
            modified: self.runtime.now(),
            ..release
        };
        self.store.update_release(&release)?;
        self.register_classifiers(&release)?;
        debug!("Saved release {}", release);

        self.signals.send(
            &self.store,
            &PostSave {
                release: key.clone(),
                created: false,
            },
        )?;
        self.require_release(&key)
    }

    /// Toggle the `hidden` flag of a release.
    pub fn set_hidden(&self, key: &ReleaseKey, hidden: bool) -> Result<Release> {
        let release = self.require_release(key)?;
        self.save_release(Release { hidden, ..release })
    }

    fn register_classifiers(&self, release: &Release) -> Result<()> {
        for trove in &release.classifiers {
            self.store.ensure_classifier(trove)?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, file), fields(file = %file))]
    pub fn add_release_file(&self, file: ReleaseFile) -> Result<ReleaseFile> {
        self.require_release(&file.release)?;
        file.validate()?;

        let now = self.runtime.now();
        let file = ReleaseFile {
            downloads: 0,
            created: now,
            modified: now,
            ..file
        };
        self.store.insert_release_file(&file)?;
        info!("Added {} to {}", file.display_name(), file.release);
        Ok(file)
    }

    /// Count one download of `filename` and return the new total for that file.
    #[tracing::instrument(skip(self))]
    pub fn record_download(&self, key: &ReleaseKey, filename: &str) -> Result<u64> {
        self.require_release(key)?;
        let downloads = self.store.increment_downloads(key, filename)?;
        debug!("{} of {} downloaded {} time(s)", filename, key, downloads);
        Ok(downloads)
    }

    #[tracing::instrument(skip(self, dependency), fields(dependency = %dependency))]
    pub fn add_dependency(&self, dependency: ReleaseDependency) -> Result<()> {
        self.require_release(&dependency.release)?;
        dependency.validate()?;
        self.store.insert_dependency(&dependency)?;
        info!(
            "Added {} {} to {}",
            dependency.kind.label(),
            dependency,
            dependency.release
        );
        Ok(())
    }

    /// Re-run the ordering for one package. Returns the number of releases
    /// whose rank changed.
    #[tracing::instrument(skip(self))]
    pub fn reorder(&self, package: &str) -> Result<usize> {
        self.require_package(package)?;
        VersionOrdering::new(Rc::clone(&self.normalizer)).apply(&self.store, package)
    }

    /// Sum of the downloads of every file of the release; 0 without files.
    pub fn release_downloads(&self, key: &ReleaseKey) -> Result<u64> {
        Ok(self
            .store
            .release_files(key)?
            .iter()
            .map(|f| f.downloads)
            .sum())
    }

    /// Sum of the downloads of every file of every release of the package.
    pub fn package_downloads(&self, package: &str) -> Result<u64> {
        Ok(self
            .store
            .package_files(package)?
            .iter()
            .map(|f| f.downloads)
            .sum())
    }

    /// Requirement line of the package's latest release, if any.
    pub fn requirement_line(&self, package: &str) -> Result<Option<String>> {
        let releases = self.store.releases(package)?;
        Ok(Package::latest(&releases).map(|r| r.requirement_line(self.normalizer.as_ref())))
    }

    #[tracing::instrument(skip(self))]
    pub fn package_summary(&self, name: &str) -> Result<PackageSummary> {
        let package = self.require_package(name)?;
        let releases = self.store.releases(name)?;
        let latest = Package::latest(&releases).cloned();

        let mut summaries = Vec::with_capacity(releases.len());
        for release in releases {
            let key = release.key();
            let files = self.store.release_files(&key)?;
            summaries.push(ReleaseSummary {
                downloads: files.iter().map(|f| f.downloads).sum(),
                install_command: release.install_command(),
                requirement_line: release.requirement_line(self.normalizer.as_ref()),
                dependencies: self.store.dependencies(&key)?,
                files,
                release,
            });
        }
        summaries.sort_by(|a, b| b.release.order.cmp(&a.release.order));

        Ok(PackageSummary {
            url: self.urls.package_detail(&package.name),
            downloads: summaries.iter().map(|s| s.downloads).sum(),
            install_command: package.install_command(),
            requirement_line: latest
                .as_ref()
                .map(|r| r.requirement_line(self.normalizer.as_ref())),
            latest,
            releases: summaries,
            package,
        })
    }
}
