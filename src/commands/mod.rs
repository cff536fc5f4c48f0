use crate::{
    domain::service::IndexService, runtime::Runtime, storage::FileStorage, store::JsonStore,
    urls::UrlResolver,
};

pub mod config;
mod classifiers;
mod dep;
mod file;
mod list;
mod package;
mod release;
mod reorder;
mod show;

pub use classifiers::classifiers;
pub use dep::dep_add;
pub use file::{FileOptions, file_add, file_download};
pub use list::list;
pub use package::package_add;
pub use release::{release_add, release_hide};
pub use reorder::reorder;
pub use show::show;

use config::IndexConfig;

/// Index service backed by the JSON documents under the configured root.
pub(crate) fn open_index<'a, R: Runtime>(
    runtime: &'a R,
    config: &IndexConfig,
) -> IndexService<'a, R, JsonStore<'a, R>> {
    IndexService::new(
        runtime,
        JsonStore::new(runtime, config.root.clone()),
        UrlResolver::new(config.base_url.as_str()),
    )
}

pub(crate) fn open_storage<'a, R: Runtime>(
    runtime: &'a R,
    config: &IndexConfig,
) -> FileStorage<'a, R> {
    FileStorage::new(runtime, config.files_dir())
}
