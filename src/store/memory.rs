use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::domain::model::{
    Package, Release, ReleaseDependency, ReleaseFile, ReleaseKey, TroveClassifier,
};
use crate::error::{IndexError, Result};

use super::{IndexStore, PackageDocument};

#[derive(Debug, Default)]
struct Tables {
    packages: BTreeMap<String, PackageDocument>,
    classifiers: BTreeMap<String, TroveClassifier>,
}

/// In-process store. Not shared across threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_document<T>(
        &self,
        package: &str,
        f: impl FnOnce(&mut PackageDocument) -> Result<T>,
    ) -> Result<T> {
        let mut tables = self.tables.borrow_mut();
        let document = tables
            .packages
            .get_mut(package)
            .ok_or_else(|| IndexError::PackageNotFound(package.to_string()))?;
        f(document)
    }
}

impl IndexStore for MemoryStore {
    fn insert_package(&self, package: &Package) -> Result<()> {
        let mut tables = self.tables.borrow_mut();
        if tables.packages.contains_key(&package.name) {
            return Err(IndexError::PackageExists(package.name.clone()));
        }
        tables
            .packages
            .insert(package.name.clone(), PackageDocument::new(package.clone()));
        Ok(())
    }

    fn package(&self, name: &str) -> Result<Option<Package>> {
        Ok(self
            .tables
            .borrow()
            .packages
            .get(name)
            .map(|doc| doc.package.clone()))
    }

    fn packages(&self) -> Result<Vec<Package>> {
        Ok(self
            .tables
            .borrow()
            .packages
            .values()
            .map(|doc| doc.package.clone())
            .collect())
    }

    fn insert_release(&self, release: &Release) -> Result<()> {
        self.with_document(&release.package, |doc| doc.insert_release(release))
    }

    fn update_release(&self, release: &Release) -> Result<()> {
        self.with_document(&release.package, |doc| doc.update_release(release))
    }

    fn release(&self, key: &ReleaseKey) -> Result<Option<Release>> {
        Ok(self
            .tables
            .borrow()
            .packages
            .get(&key.package)
            .and_then(|doc| doc.record(&key.version))
            .map(|record| record.release.clone()))
    }

    fn releases(&self, package: &str) -> Result<Vec<Release>> {
        self.with_document(package, |doc| Ok(doc.releases()))
    }

    fn set_release_order(&self, key: &ReleaseKey, order: i64) -> Result<()> {
        self.with_document(&key.package, |doc| doc.set_order(&key.version, order))
    }

    fn insert_release_file(&self, file: &ReleaseFile) -> Result<()> {
        self.with_document(&file.release.package, |doc| doc.insert_file(file))
    }

    fn release_files(&self, key: &ReleaseKey) -> Result<Vec<ReleaseFile>> {
        self.with_document(&key.package, |doc| {
            Ok(doc
                .record(&key.version)
                .map(|record| record.files.clone())
                .unwrap_or_default())
        })
    }

    fn package_files(&self, package: &str) -> Result<Vec<ReleaseFile>> {
        self.with_document(package, |doc| Ok(doc.files()))
    }

    fn increment_downloads(&self, key: &ReleaseKey, filename: &str) -> Result<u64> {
        self.with_document(&key.package, |doc| doc.increment_downloads(key, filename))
    }

    fn insert_dependency(&self, dependency: &ReleaseDependency) -> Result<()> {
        self.with_document(&dependency.release.package, |doc| {
            doc.insert_dependency(dependency)
        })
    }

    fn dependencies(&self, key: &ReleaseKey) -> Result<Vec<ReleaseDependency>> {
        self.with_document(&key.package, |doc| {
            Ok(doc
                .record(&key.version)
                .map(|record| record.dependencies.clone())
                .unwrap_or_default())
        })
    }

    fn ensure_classifier(&self, trove: &str) -> Result<TroveClassifier> {
        let classifier = TroveClassifier::new(trove);
        classifier.validate()?;
        let mut tables = self.tables.borrow_mut();
        Ok(tables
            .classifiers
            .entry(trove.to_string())
            .or_insert(classifier)
            .clone())
    }

    fn classifiers(&self) -> Result<Vec<TroveClassifier>> {
        Ok(self.tables.borrow().classifiers.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store_with_foo() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_package(&Package::new("foo", Utc::now())).unwrap();
        store
    }

    #[test]
    fn test_package_unique() {
        let store = store_with_foo();
        let err = store
            .insert_package(&Package::new("foo", Utc::now()))
            .unwrap_err();
        assert!(matches!(err, IndexError::PackageExists(name) if name == "foo"));
    }

    #[test]
    fn test_packages_sorted_by_name() {
        let store = MemoryStore::new();
        for name in ["zope", "attrs", "django"] {
            store.insert_package(&Package::new(name, Utc::now())).unwrap();
        }
        let names: Vec<String> = store.packages().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["attrs", "django", "zope"]);
    }

    #[test]
    fn test_release_requires_package() {
        let store = MemoryStore::new();
        let err = store.insert_release(&Release::new("ghost", "1.0")).unwrap_err();
        assert!(matches!(err, IndexError::PackageNotFound(_)));
    }

    #[test]
    fn test_releases_keep_insertion_order() {
        let store = store_with_foo();
        for version in ["2.0", "1.0", "1.5"] {
            store.insert_release(&Release::new("foo", version)).unwrap();
        }
        let versions: Vec<String> = store
            .releases("foo")
            .unwrap()
            .into_iter()
            .map(|r| r.version)
            .collect();
        assert_eq!(versions, vec!["2.0", "1.0", "1.5"]);
    }

    #[test]
    fn test_release_lookup_and_order() {
        let store = store_with_foo();
        store.insert_release(&Release::new("foo", "1.0")).unwrap();
        let key = ReleaseKey::new("foo", "1.0");

        store.set_release_order(&key, 4).unwrap();
        assert_eq!(store.release(&key).unwrap().unwrap().order, 4);
        assert!(store.release(&ReleaseKey::new("foo", "2.0")).unwrap().is_none());
        assert!(store.release(&ReleaseKey::new("bar", "1.0")).unwrap().is_none());
    }

    #[test]
    fn test_classifiers_are_deduplicated() {
        let store = MemoryStore::new();
        store.ensure_classifier("License :: OSI Approved").unwrap();
        store.ensure_classifier("Framework :: Django").unwrap();
        store.ensure_classifier("License :: OSI Approved").unwrap();

        let troves: Vec<String> = store
            .classifiers()
            .unwrap()
            .into_iter()
            .map(|c| c.trove)
            .collect();
        assert_eq!(troves, vec!["Framework :: Django", "License :: OSI Approved"]);
        assert!(store.ensure_classifier("  ").is_err());
    }
}
