//! Persistence for the index.
//!
//! [`IndexStore`] is the seam between the domain and whatever keeps the rows.
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`] - everything in a `BTreeMap`, used by tests and
//!   embedders that bring their own persistence
//! - [`JsonStore`] - one JSON document per package under the index root

mod document;
mod json;
mod memory;

pub use document::PackageDocument;
pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::domain::model::{
    Package, Release, ReleaseDependency, ReleaseFile, ReleaseKey, TroveClassifier,
};
use crate::error::Result;

/// Row-level access to packages, releases and their metadata.
///
/// Inserts enforce the unique constraints of the model and fail with a
/// conflict error; operations on missing parents fail with a not-found error.
#[cfg_attr(test, mockall::automock)]
pub trait IndexStore {
    fn insert_package(&self, package: &Package) -> Result<()>;
    fn package(&self, name: &str) -> Result<Option<Package>>;
    /// All packages, sorted by name.
    fn packages(&self) -> Result<Vec<Package>>;

    fn insert_release(&self, release: &Release) -> Result<()>;
    /// Replace a release's metadata. The stored `order` and `created` are kept.
    fn update_release(&self, release: &Release) -> Result<()>;
    fn release(&self, key: &ReleaseKey) -> Result<Option<Release>>;
    /// Releases of a package in insertion order.
    fn releases(&self, package: &str) -> Result<Vec<Release>>;
    fn set_release_order(&self, key: &ReleaseKey, order: i64) -> Result<()>;

    fn insert_release_file(&self, file: &ReleaseFile) -> Result<()>;
    fn release_files(&self, key: &ReleaseKey) -> Result<Vec<ReleaseFile>>;
    /// Files of every release of a package.
    fn package_files(&self, package: &str) -> Result<Vec<ReleaseFile>>;
    /// Bump the download counter of the file displayed as `filename` and
    /// return the new count.
    fn increment_downloads(&self, key: &ReleaseKey, filename: &str) -> Result<u64>;

    fn insert_dependency(&self, dependency: &ReleaseDependency) -> Result<()>;
    fn dependencies(&self, key: &ReleaseKey) -> Result<Vec<ReleaseDependency>>;

    /// Fetch a classifier, creating it when it does not exist yet.
    fn ensure_classifier(&self, trove: &str) -> Result<TroveClassifier>;
    /// All classifiers, sorted.
    fn classifiers(&self) -> Result<Vec<TroveClassifier>>;
}
