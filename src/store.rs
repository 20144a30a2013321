//! Inventory Store
//!
//! The authoritative in-memory collection. Cloning the store clones the
//! handle, so readers can keep querying while a mutation awaits the item store.
//!
//! Locks are never held across an await point.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Item, ItemId};
use crate::tree::Tree;

/// Whole-collection copy taken before an optimistic update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Vec<Item>);

impl Snapshot {
    pub fn items(&self) -> &[Item] {
        &self.0
    }
}

/// Shared handle to the item collection
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    items: Arc<RwLock<Vec<Item>>>,
}

impl InventoryStore {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Vec<Item>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Vec<Item>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a query against the current collection
    pub fn read<R>(&self, f: impl FnOnce(Tree<'_>) -> R) -> R {
        let items = self.read_guard();
        f(Tree::new(&items))
    }

    /// Current collection, in iteration order
    pub fn items(&self) -> Vec<Item> {
        self.read_guard().clone()
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<Item> {
        self.read(|tree| tree.get(id).cloned())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.items())
    }

    /// Put back a snapshot wholesale
    pub fn restore(&self, snapshot: Snapshot) {
        *self.write_guard() = snapshot.0;
    }

    /// Replace the collection (initial load)
    pub fn replace_all(&self, items: Vec<Item>) {
        *self.write_guard() = items;
    }

    /// Append an item to the collection
    pub fn add_item(&self, item: Item) {
        self.write_guard().push(item);
    }

    /// Update an item in place by id; false if it is not there
    pub fn update_item(&self, id: &ItemId, f: impl FnOnce(&mut Item)) -> bool {
        let mut items = self.write_guard();
        match items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }

    /// Swap the record stored under `id` for `item`, keeping its slot
    pub fn replace_item(&self, id: &ItemId, item: Item) -> bool {
        self.update_item(id, |slot| *slot = item)
    }

    /// Remove every item whose id is in `ids`
    pub fn remove_items(&self, ids: &HashSet<ItemId>) {
        self.write_guard().retain(|item| !ids.contains(&item.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_restore() {
        let store = InventoryStore::new(vec![Item::new(1u32, "Garage"), Item::new_child(2u32, "Shelf", 1u32, 0)]);
        let before = store.snapshot();

        store.update_item(&1u32.into(), |item| item.name = "Shed".to_string());
        store.remove_items(&[ItemId::from(2u32)].into_iter().collect());
        assert_eq!(store.len(), 1);

        store.restore(before.clone());
        assert_eq!(store.items(), before.items());
    }

    #[test]
    fn test_clones_share_state() {
        let store = InventoryStore::default();
        let reader = store.clone();

        store.add_item(Item::new(1u32, "Garage"));
        assert_eq!(reader.read(|tree| tree.root_items().len()), 1);
    }

    #[test]
    fn test_replace_keeps_slot() {
        let store = InventoryStore::new(vec![Item::new("pending-1", "Box"), Item::new(2u32, "Bin")]);
        assert!(store.replace_item(&"pending-1".into(), Item::new(9u32, "Box")));
        assert_eq!(store.items()[0].id, ItemId::from(9u32));
        assert!(!store.update_item(&"missing".into(), |_| {}));
    }
}
