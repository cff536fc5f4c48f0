//! Release ordering.
//!
//! Versions that normalize sort semantically; everything else ("dated"
//! releases such as `2023-01-dev`) sorts by creation time and ranks below
//! every normalized version. The two runs are concatenated and each release's
//! `order` becomes its position in the result.

use log::{debug, info};
use std::rc::Rc;

use crate::domain::model::{Release, ReleaseKey};
use crate::error::Result;
use crate::store::IndexStore;
use crate::version::{Normalize, NormalizedVersion};

use super::signals::{PostSave, ReleaseReceiver};

/// A release whose stored `order` differs from its computed rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderChange {
    pub release: ReleaseKey,
    pub from: i64,
    pub to: i64,
}

/// Compute the ranks of `releases` and return only the ones that move.
///
/// Sorting is stable, so equal versions and equal timestamps keep the order
/// they have in `releases`.
pub fn plan_order<N: Normalize + ?Sized>(releases: &[Release], normalizer: &N) -> Vec<OrderChange> {
    let mut versioned: Vec<(NormalizedVersion, &Release)> = Vec::new();
    let mut dated: Vec<&Release> = Vec::new();

    for release in releases {
        match normalizer.normalize(&release.version) {
            Some(version) => versioned.push((version, release)),
            None => dated.push(release),
        }
    }

    versioned.sort_by(|a, b| a.0.cmp(&b.0));
    dated.sort_by_key(|r| r.created);

    dated
        .into_iter()
        .chain(versioned.into_iter().map(|(_, r)| r))
        .enumerate()
        .filter_map(|(position, release)| {
            let to = position as i64;
            (release.order != to).then(|| OrderChange {
                release: release.key(),
                from: release.order,
                to,
            })
        })
        .collect()
}

/// Keeps a package's `order` values in sync with its releases.
pub struct VersionOrdering {
    normalizer: Rc<dyn Normalize>,
}

impl VersionOrdering {
    pub fn new(normalizer: Rc<dyn Normalize>) -> Self {
        Self { normalizer }
    }

    /// Re-rank every release of `package`, writing only the ones that
    /// changed. Returns the number of writes.
    #[tracing::instrument(skip(self, store))]
    pub fn apply(&self, store: &dyn IndexStore, package: &str) -> Result<usize> {
        let releases = store.releases(package)?;
        let changes = plan_order(&releases, self.normalizer.as_ref());

        for change in &changes {
            debug!(
                "Reordering {}: {} -> {}",
                change.release, change.from, change.to
            );
            store.set_release_order(&change.release, change.to)?;
        }

        if !changes.is_empty() {
            info!(
                "Reordered {} of {} release(s) of {}",
                changes.len(),
                releases.len(),
                package
            );
        }
        Ok(changes.len())
    }
}

impl ReleaseReceiver for VersionOrdering {
    fn name(&self) -> &'static str {
        "version_ordering"
    }

    fn post_save(&self, store: &dyn IndexStore, event: &PostSave) -> Result<()> {
        if event.created {
            self.apply(store, &event.release.package)?;
        }
        Ok(())
    }
}
