//! JSON document store.
//!
//! Layout under the index root:
//!
//! ```text
//! <root>/packages/<name>/package.json
//! <root>/classifiers.json
//! ```

use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::domain::model::{
    Package, Release, ReleaseDependency, ReleaseFile, ReleaseKey, TroveClassifier,
};
use crate::error::{IndexError, Result};
use crate::runtime::Runtime;

use super::{IndexStore, PackageDocument};

const DOCUMENT_NAME: &str = "package.json";
const CLASSIFIERS_NAME: &str = "classifiers.json";

/// Store keeping one JSON document per package on disk.
pub struct JsonStore<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> JsonStore<'a, R> {
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns: `<root>/packages`
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    /// Returns: `<root>/packages/<name>/package.json`
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.packages_dir().join(name).join(DOCUMENT_NAME)
    }

    /// Returns: `<root>/classifiers.json`
    pub fn classifiers_path(&self) -> PathBuf {
        self.root.join(CLASSIFIERS_NAME)
    }

    #[tracing::instrument(skip(self))]
    fn load(&self, name: &str) -> Result<Option<PackageDocument>> {
        let path = self.document_path(name);
        if !self.runtime.exists(&path) {
            return Ok(None);
        }
        let content = self.runtime.read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn load_required(&self, name: &str) -> Result<PackageDocument> {
        self.load(name)?
            .ok_or_else(|| IndexError::PackageNotFound(name.to_string()))
    }

    /// Write `value` next to `path` and move it into place.
    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        self.runtime.write(&tmp, content.as_bytes())?;
        self.runtime.rename(&tmp, path)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, document), fields(package = %document.package.name))]
    fn save(&self, document: &PackageDocument) -> Result<()> {
        debug!("Saving {}", document.package.name);
        self.write_json(&self.document_path(&document.package.name), document)
    }

    fn update<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut PackageDocument) -> Result<T>,
    ) -> Result<T> {
        let mut document = self.load_required(name)?;
        let value = f(&mut document)?;
        self.save(&document)?;
        Ok(value)
    }

    fn load_classifiers(&self) -> Result<Vec<TroveClassifier>> {
        let path = self.classifiers_path();
        if !self.runtime.exists(&path) {
            return Ok(Vec::new());
        }
        let content = self.runtime.read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl<R: Runtime> IndexStore for JsonStore<'_, R> {
    fn insert_package(&self, package: &Package) -> Result<()> {
        if self.runtime.exists(&self.document_path(&package.name)) {
            return Err(IndexError::PackageExists(package.name.clone()));
        }
        self.save(&PackageDocument::new(package.clone()))
    }

    fn package(&self, name: &str) -> Result<Option<Package>> {
        Ok(self.load(name)?.map(|doc| doc.package))
    }

    #[tracing::instrument(skip(self))]
    fn packages(&self) -> Result<Vec<Package>> {
        let dir = self.packages_dir();
        if !self.runtime.exists(&dir) {
            return Ok(Vec::new());
        }

        let mut packages = Vec::new();
        for entry in self.runtime.read_dir(&dir)? {
            if !self.runtime.is_dir(&entry) {
                continue;
            }
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match self.load(name) {
                Ok(Some(doc)) => packages.push(doc.package),
                Ok(None) => {}
                Err(e) => warn!("Failed to load package document for {}: {}", name, e),
            }
        }
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packages)
    }

    fn insert_release(&self, release: &Release) -> Result<()> {
        self.update(&release.package, |doc| doc.insert_release(release))
    }

    fn update_release(&self, release: &Release) -> Result<()> {
        self.update(&release.package, |doc| doc.update_release(release))
    }

    fn release(&self, key: &ReleaseKey) -> Result<Option<Release>> {
        Ok(self
            .load(&key.package)?
            .and_then(|doc| doc.record(&key.version).map(|r| r.release.clone())))
    }

    fn releases(&self, package: &str) -> Result<Vec<Release>> {
        Ok(self.load_required(package)?.releases())
    }

    fn set_release_order(&self, key: &ReleaseKey, order: i64) -> Result<()> {
        self.update(&key.package, |doc| doc.set_order(&key.version, order))
    }

    fn insert_release_file(&self, file: &ReleaseFile) -> Result<()> {
        self.update(&file.release.package, |doc| doc.insert_file(file))
    }

    fn release_files(&self, key: &ReleaseKey) -> Result<Vec<ReleaseFile>> {
        Ok(self
            .load_required(&key.package)?
            .record(&key.version)
            .map(|r| r.files.clone())
            .unwrap_or_default())
    }

    fn package_files(&self, package: &str) -> Result<Vec<ReleaseFile>> {
        Ok(self.load_required(package)?.files())
    }

    fn increment_downloads(&self, key: &ReleaseKey, filename: &str) -> Result<u64> {
        self.update(&key.package, |doc| doc.increment_downloads(key, filename))
    }

    fn insert_dependency(&self, dependency: &ReleaseDependency) -> Result<()> {
        self.update(&dependency.release.package, |doc| {
            doc.insert_dependency(dependency)
        })
    }

    fn dependencies(&self, key: &ReleaseKey) -> Result<Vec<ReleaseDependency>> {
        Ok(self
            .load_required(&key.package)?
            .record(&key.version)
            .map(|r| r.dependencies.clone())
            .unwrap_or_default())
    }

    fn ensure_classifier(&self, trove: &str) -> Result<TroveClassifier> {
        let classifier = TroveClassifier::new(trove);
        classifier.validate()?;

        let mut classifiers = self.load_classifiers()?;
        if let Some(existing) = classifiers.iter().find(|c| c.trove == trove) {
            return Ok(existing.clone());
        }
        classifiers.push(classifier.clone());
        classifiers.sort();
        self.write_json(&self.classifiers_path(), &classifiers)?;
        Ok(classifier)
    }

    fn classifiers(&self) -> Result<Vec<TroveClassifier>> {
        self.load_classifiers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DependencyKind, FileType};
    use crate::runtime::{MockRuntime, RealRuntime};
    use chrono::Utc;
    use mockall::predicate::eq;
    use tempfile::tempdir;

    #[test]
    fn test_paths() {
        let runtime = MockRuntime::new();
        let store = JsonStore::new(&runtime, PathBuf::from("/index"));

        assert_eq!(store.packages_dir(), PathBuf::from("/index/packages"));
        assert_eq!(
            store.document_path("foo"),
            PathBuf::from("/index/packages/foo/package.json")
        );
        assert_eq!(
            store.classifiers_path(),
            PathBuf::from("/index/classifiers.json")
        );
    }

    #[test]
    fn test_missing_package_is_none() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/index/packages/foo/package.json")))
            .returning(|_| false);

        let store = JsonStore::new(&runtime, PathBuf::from("/index"));
        assert!(store.package("foo").unwrap().is_none());
    }

    #[test]
    fn test_insert_package_writes_then_renames() {
        let mut runtime = MockRuntime::new();
        let doc_path = PathBuf::from("/index/packages/foo/package.json");
        let tmp_path = PathBuf::from("/index/packages/foo/package.json.tmp");

        runtime
            .expect_exists()
            .with(eq(doc_path.clone()))
            .returning(|_| false);
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/index/packages/foo")))
            .returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/index/packages/foo")))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(move |path, contents| {
                path == tmp_path.as_path() && String::from_utf8_lossy(contents).contains("\"foo\"")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .with(
                eq(PathBuf::from("/index/packages/foo/package.json.tmp")),
                eq(doc_path),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let store = JsonStore::new(&runtime, PathBuf::from("/index"));
        store
            .insert_package(&Package::new("foo", Utc::now()))
            .unwrap();
    }

    #[test]
    fn test_insert_existing_package_conflicts() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);

        let store = JsonStore::new(&runtime, PathBuf::from("/index"));
        let err = store
            .insert_package(&Package::new("foo", Utc::now()))
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_round_trip_on_disk() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let store = JsonStore::new(&runtime, dir.path().to_path_buf());

        store.insert_package(&Package::new("foo", Utc::now())).unwrap();
        store.insert_release(&Release::new("foo", "1.0")).unwrap();
        store.insert_release(&Release::new("foo", "0.9")).unwrap();

        let key = ReleaseKey::new("foo", "1.0");
        store.set_release_order(&key, 1).unwrap();

        let mut file = ReleaseFile::new(
            key.clone(),
            FileType::Sdist,
            "packages/foo-1.0.tar.gz",
            "abc",
            "source",
        );
        file.filename = Some("foo-1.0.tar.gz".into());
        store.insert_release_file(&file).unwrap();
        assert_eq!(store.increment_downloads(&key, "foo-1.0.tar.gz").unwrap(), 1);

        store
            .insert_dependency(&ReleaseDependency::new(
                key.clone(),
                DependencyKind::Requires,
                "bar",
            ))
            .unwrap();

        // A second store over the same root sees everything.
        let reopened = JsonStore::new(&runtime, dir.path().to_path_buf());
        let versions: Vec<String> = reopened
            .releases("foo")
            .unwrap()
            .into_iter()
            .map(|r| r.version)
            .collect();
        assert_eq!(versions, vec!["1.0", "0.9"]);
        assert_eq!(reopened.release(&key).unwrap().unwrap().order, 1);
        assert_eq!(reopened.package_files("foo").unwrap()[0].downloads, 1);
        assert_eq!(reopened.dependencies(&key).unwrap()[0].name, "bar");
        assert!(!dir.path().join("packages/foo/package.json.tmp").exists());
    }

    #[test]
    fn test_packages_skips_unreadable_documents() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let store = JsonStore::new(&runtime, dir.path().to_path_buf());

        store.insert_package(&Package::new("good", Utc::now())).unwrap();
        std::fs::create_dir_all(dir.path().join("packages/bad")).unwrap();
        std::fs::write(dir.path().join("packages/bad/package.json"), "not json").unwrap();
        std::fs::create_dir_all(dir.path().join("packages/empty")).unwrap();

        let names: Vec<String> = store.packages().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["good"]);
    }

    #[test]
    fn test_classifiers_persist_sorted() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let store = JsonStore::new(&runtime, dir.path().to_path_buf());

        store.ensure_classifier("Topic :: Utilities").unwrap();
        store.ensure_classifier("Framework :: Django").unwrap();
        store.ensure_classifier("Topic :: Utilities").unwrap();

        let troves: Vec<String> = store
            .classifiers()
            .unwrap()
            .into_iter()
            .map(|c| c.trove)
            .collect();
        assert_eq!(troves, vec!["Framework :: Django", "Topic :: Utilities"]);
    }

    #[test]
    fn test_release_on_missing_package_fails() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let store = JsonStore::new(&runtime, dir.path().to_path_buf());

        let err = store.insert_release(&Release::new("ghost", "1.0")).unwrap_err();
        assert!(matches!(err, IndexError::PackageNotFound(_)));
    }
}
