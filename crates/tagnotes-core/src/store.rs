//! Note list store
//!
//! The `ListStore` owns the ordered list and mediates every change to it.
//!
//! ## Write-through
//!
//! Every mutation encodes the whole list and hands it to the persistence
//! collaborator before returning. A failed save is logged and counted but not
//! returned: the in-memory list stays updated, and the next successful save
//! catches storage up. Batch operations (`add_all`, `replace_all`, sorts,
//! moves) save once.
//!
//! ## Positions
//!
//! Positions are dense and 0-based. The front of the list holds the most
//! recently added or imported notes. Out-of-range positions fail with
//! [`StoreError::Index`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = ListStore::open(FilePersistence::new(&config))?;
//!
//! store.add(ListItem::new("Milk", "", "Groceries"));
//! let removed = store.remove(0)?;
//! store.insert(0, removed)?; // undo
//! ```

use std::cmp::Reverse;

use tracing::{debug, warn};

use crate::codec;
use crate::models::ListItem;
use crate::storage::error::{check_access, check_insert};
use crate::storage::{Persistence, StoreError, StoreResult};

/// Owner of the canonical note list
#[derive(Debug)]
pub struct ListStore<P> {
    items: Vec<ListItem>,
    persistence: P,
    failed_saves: usize,
}

impl<P: Persistence> ListStore<P> {
    /// Open the store, loading whatever was saved
    ///
    /// Nothing saved yet opens an empty list. A persistence collaborator that
    /// cannot be read is an error.
    pub fn open(persistence: P) -> StoreResult<Self> {
        Self::open_or_seed(persistence, Vec::new())
    }

    /// Open the store, starting from `seed` if nothing was ever saved
    ///
    /// The seed is saved right away so the next open loads it.
    pub fn open_or_seed(persistence: P, seed: Vec<ListItem>) -> StoreResult<Self> {
        let saved = persistence.load().map_err(StoreError::load)?;

        let mut store = Self {
            items: Vec::new(),
            persistence,
            failed_saves: 0,
        };

        match saved {
            Some(payload) => {
                store.items = codec::decode(&payload);
                debug!("Loaded {} item(s)", store.items.len());
            }
            None if !seed.is_empty() => {
                store.items = seed;
                store.persist();
                debug!("Seeded new list with {} item(s)", store.items.len());
            }
            None => {}
        }

        Ok(store)
    }

    // ==================== Insertion ====================

    /// Insert an item at `position` (0..=len)
    pub fn insert(&mut self, position: usize, item: ListItem) -> StoreResult<()> {
        check_insert(position, self.items.len())?;
        self.items.insert(position, item);
        self.persist();
        Ok(())
    }

    /// Add an item at the front
    pub fn add(&mut self, item: ListItem) {
        self.items.insert(0, item);
        self.persist();
    }

    /// Add an item at the back
    pub fn add_to_back(&mut self, item: ListItem) {
        self.items.push(item);
        self.persist();
    }

    /// Prepend a batch, keeping its order (imports)
    ///
    /// Returns the number of items added.
    pub fn add_all(&mut self, items: impl IntoIterator<Item = ListItem>) -> usize {
        let before = self.items.len();
        self.items.splice(0..0, items);
        let added = self.items.len() - before;
        if added > 0 {
            self.persist();
        }
        added
    }

    /// Append a batch, keeping its order
    ///
    /// Returns the number of items added.
    pub fn add_all_to_back(&mut self, items: impl IntoIterator<Item = ListItem>) -> usize {
        let before = self.items.len();
        self.items.extend(items);
        let added = self.items.len() - before;
        if added > 0 {
            self.persist();
        }
        added
    }

    // ==================== Update / removal ====================

    /// Overwrite the item at `position`, returning the previous one
    pub fn set(&mut self, position: usize, item: ListItem) -> StoreResult<ListItem> {
        check_access(position, self.items.len())?;
        let previous = std::mem::replace(&mut self.items[position], item);
        self.persist();
        Ok(previous)
    }

    /// Remove the item at `position` and hand it back
    ///
    /// The store keeps no undo history. To undo, re-insert the returned item
    /// at the same position.
    pub fn remove(&mut self, position: usize) -> StoreResult<ListItem> {
        check_access(position, self.items.len())?;
        let removed = self.items.remove(position);
        self.persist();
        Ok(removed)
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Replace the whole list in one step
    pub fn replace_all(&mut self, items: Vec<ListItem>) {
        self.items = items;
        self.persist();
    }

    // ==================== Reordering ====================

    /// Move the item at `from` so that it ends up at `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> StoreResult<()> {
        let len = self.items.len();
        check_access(from, len)?;
        check_access(to, len)?;
        if from == to {
            return Ok(());
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.persist();
        Ok(())
    }

    /// Send the front item to the back, or any other item to the front
    ///
    /// Returns the item's new position.
    pub fn bump(&mut self, position: usize) -> StoreResult<usize> {
        let len = self.items.len();
        check_access(position, len)?;

        let target = if position == 0 { len - 1 } else { 0 };
        let item = self.items.remove(position);
        self.items.insert(target, item);
        self.persist();
        Ok(target)
    }

    /// Stable sort by label
    pub fn sort_by_label(&mut self) {
        self.items.sort_by(|a, b| a.label.cmp(&b.label));
        self.persist();
    }

    /// Stable sort by tag, then label
    pub fn sort_by_tag(&mut self) {
        self.items
            .sort_by(|a, b| a.tag.cmp(&b.tag).then_with(|| a.label.cmp(&b.label)));
        self.persist();
    }

    /// Stable sort by label length, longest first
    pub fn sort_by_length(&mut self) {
        self.items.sort_by_key(|item| Reverse(item.label.chars().count()));
        self.persist();
    }

    /// Stable sort by total size of all fields, heaviest first
    pub fn sort_by_size(&mut self) {
        self.items.sort_by_key(|item| Reverse(item.char_count()));
        self.persist();
    }

    // ==================== Queries ====================

    /// Get the item at `position`
    pub fn get(&self, position: usize) -> StoreResult<&ListItem> {
        check_access(position, self.items.len())?;
        Ok(&self.items[position])
    }

    /// All items, front first
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Encode the current list
    pub fn payload(&self) -> Vec<u8> {
        codec::encode(&self.items)
    }

    /// Number of saves that failed since the store was opened
    pub fn failed_saves(&self) -> usize {
        self.failed_saves
    }

    /// The persistence collaborator
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn persist(&mut self) {
        let payload = self.payload();
        if let Err(e) = self.persistence.save(&payload) {
            self.failed_saves += 1;
            warn!("Failed to save list ({} item(s)): {:#}", self.items.len(), e);
        }
    }
}
