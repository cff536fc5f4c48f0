//! Post-save notifications for releases.

use log::debug;

use crate::domain::model::ReleaseKey;
use crate::error::Result;
use crate::store::IndexStore;

/// Sent after a release row has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSave {
    pub release: ReleaseKey,
    /// True when the row was inserted, false when an existing row was updated.
    pub created: bool,
}

/// Something that reacts to saved releases.
pub trait ReleaseReceiver {
    fn name(&self) -> &'static str;
    fn post_save(&self, store: &dyn IndexStore, event: &PostSave) -> Result<()>;
}

/// Receivers connected to the release post-save signal.
#[derive(Default)]
pub struct Signals {
    receivers: Vec<Box<dyn ReleaseReceiver>>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, receiver: Box<dyn ReleaseReceiver>) {
        self.receivers.push(receiver);
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Deliver `event` to every receiver in connection order.
    ///
    /// Stops at the first receiver that fails and returns its error.
    #[tracing::instrument(skip(self, store))]
    pub fn send(&self, store: &dyn IndexStore, event: &PostSave) -> Result<()> {
        for receiver in &self.receivers {
            debug!("Dispatching post_save for {} to {}", event.release, receiver.name());
            receiver.post_save(store, event)?;
        }
        Ok(())
    }
}

/// Receiver that records every event it sees, optionally failing.
#[cfg(test)]
pub(crate) struct RecordingReceiver {
    pub name: &'static str,
    pub fail: bool,
    pub seen: std::rc::Rc<std::cell::RefCell<Vec<(&'static str, PostSave)>>>,
}

#[cfg(test)]
impl ReleaseReceiver for RecordingReceiver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn post_save(&self, _store: &dyn IndexStore, event: &PostSave) -> Result<()> {
        self.seen.borrow_mut().push((self.name, event.clone()));
        if self.fail {
            return Err(crate::error::IndexError::PackageNotFound(
                event.release.package.clone(),
            ));
        }
        Ok(())
    }
}
