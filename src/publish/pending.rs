//! Pending change set shared between the collect and flush phases.

use super::capability::CacheableItems;

/// Where a change set is in its collect/flush lifecycle.
///
/// A successful flush moves straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeSetState {
    #[default]
    Idle,
    Collected,
}

/// Items waiting to be turned into jobs, in the order the provider returned them.
#[derive(Default)]
pub struct PendingChangeSet {
    to_update: CacheableItems,
    to_delete: CacheableItems,
    state: ChangeSetState,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChangeSetState {
        self.state
    }

    pub fn to_update(&self) -> &CacheableItems {
        &self.to_update
    }

    pub fn to_delete(&self) -> &CacheableItems {
        &self.to_delete
    }

    pub fn set_to_update(&mut self, items: CacheableItems) {
        self.to_update = items;
        self.state = ChangeSetState::Collected;
    }

    pub fn set_to_delete(&mut self, items: CacheableItems) {
        self.to_delete = items;
        self.state = ChangeSetState::Collected;
    }

    /// Overwrite both lists with a fresh collection result.
    pub fn replace(&mut self, to_update: CacheableItems, to_delete: CacheableItems) {
        self.to_update = to_update;
        self.to_delete = to_delete;
        self.state = ChangeSetState::Collected;
    }

    pub fn is_empty(&self) -> bool {
        self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub(crate) fn clear_updates(&mut self) {
        self.to_update.clear();
        self.settle();
    }

    pub(crate) fn clear_deletes(&mut self) {
        self.to_delete.clear();
        self.settle();
    }

    /// Return to `Idle` once nothing is left to submit.
    pub(crate) fn settle(&mut self) {
        if self.is_empty() {
            self.state = ChangeSetState::Idle;
        }
    }
}

impl std::fmt::Debug for PendingChangeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingChangeSet")
            .field("to_update", &self.to_update.len())
            .field("to_delete", &self.to_delete.len())
            .field("state", &self.state)
            .finish()
    }
}
