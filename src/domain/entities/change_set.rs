//! ChangeSet Entity
//!
//! Ordered, deduplicating accumulator for one batch of changes.

use std::collections::HashMap;

use super::path_change::PathChange;

/// Pending changes for the current batch
///
/// Holds at most one entry per relative path. A later change to a path
/// replaces the earlier one in place: the action and content are the latest
/// observed, while the position stays where the path was first seen.
#[derive(Debug, Default)]
pub struct ChangeSet {
    entries: Vec<PathChange>,
    index: HashMap<String, usize>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `change`, or overwrite the entry for the same path
    pub fn apply(&mut self, change: PathChange) {
        match self.index.get(change.relative_path()) {
            Some(&slot) => self.entries[slot] = change,
            None => {
                self.index
                    .insert(change.relative_path().to_string(), self.entries.len());
                self.entries.push(change);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up the pending change for a path
    pub fn get(&self, relative_path: &str) -> Option<&PathChange> {
        self.index.get(relative_path).map(|&slot| &self.entries[slot])
    }

    /// Take every entry in first-seen order, leaving the set empty
    pub fn drain(&mut self) -> Vec<PathChange> {
        self.index.clear();
        std::mem::take(&mut self.entries)
    }
}
