//! Ordered store of feed entries.
//!
//! The single source of truth for count, identity and order. The footer is
//! not stored here; it is projected after the last entry when visible.

use crate::model::{FeedEntry, FooterStatus, ItemId};
use std::collections::HashSet;

#[cfg(test)]
#[path = "item_store_tests.rs"]
mod tests;

/// What occupies a display position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    /// A feed entry.
    Entry(&'a FeedEntry),
    /// The trailing footer row.
    Footer,
    /// Nothing (position out of range).
    Missing,
}

/// Read-only access to the entries currently laid out.
///
/// The exposure tracker consumes this to drop snapshot samples whose item
/// disappeared between the layout pass and evaluation.
pub trait ItemLookup {
    /// Entry at `position`, if any. Never returns the footer.
    fn entry_at(&self, position: usize) -> Option<&FeedEntry>;
}

/// Ordered, identity-unique sequence of feed entries.
#[derive(Debug, Default, Clone)]
pub struct ItemStore {
    entries: Vec<FeedEntry>,
    ids: HashSet<ItemId>,
}

impl ItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents wholesale.
    ///
    /// Duplicate ids within `entries` keep their first occurrence.
    pub fn replace_all(&mut self, entries: Vec<FeedEntry>) {
        self.clear();
        self.append(entries);
    }

    /// Append a page, skipping entries whose id is already present.
    ///
    /// Returns the number of entries actually inserted.
    pub fn append(&mut self, entries: Vec<FeedEntry>) -> usize {
        let before = self.entries.len();
        for entry in entries {
            if self.ids.insert(entry.id().clone()) {
                self.entries.push(entry);
            } else {
                tracing::debug!(id = %entry.id(), "Dropping duplicate feed entry");
            }
        }
        self.entries.len() - before
    }

    /// Remove the entry at `position`.
    pub fn remove_at(&mut self, position: usize) -> Option<FeedEntry> {
        if position >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(position);
        self.ids.remove(removed.id());
        Some(removed)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ids.clear();
    }

    /// Entry at `position`.
    pub fn get(&self, position: usize) -> Option<&FeedEntry> {
        self.entries.get(position)
    }

    /// Whether an entry with `id` is present.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Current position of `id`, if present.
    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Number of entries (footer excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    /// Number of display slots, counting the footer when visible.
    pub fn display_count(&self, footer: FooterStatus) -> usize {
        self.entries.len() + usize::from(footer.is_visible())
    }

    /// Resolve a display position to an entry, the footer, or nothing.
    pub fn slot_at(&self, position: usize, footer: FooterStatus) -> Slot<'_> {
        match self.entries.get(position) {
            Some(entry) => Slot::Entry(entry),
            None if footer.is_visible() && position == self.entries.len() => Slot::Footer,
            None => Slot::Missing,
        }
    }
}

impl ItemLookup for ItemStore {
    fn entry_at(&self, position: usize) -> Option<&FeedEntry> {
        self.get(position)
    }
}
