//! Inventory Commands
//!
//! The mutation engine. Every command follows the same shape:
//! validate, snapshot, apply the change to the store right away, call the
//! item store, and put the snapshot back if that call fails.
//!
//! Single writer: commands touching the same item must not run concurrently.
//! Reads through `store()` clones are fine at any time.

mod item;
mod photo;


use std::collections::HashSet;
use std::sync::Arc;

use log::warn;

use crate::config::InventoryConfig;
use crate::domain::{DomainError, DomainResult, Item, ItemId};
use crate::focus::{focus_path, resolve_focus};
use crate::repository::{BlobStore, ItemRepository};
use crate::search::{search, SearchHit};
use crate::store::InventoryStore;
use crate::tree::LocationOption;

pub use item::{DeleteOutcome, DeletePlan, MoveOutcome};

/// One user's inventory: the in-memory tree plus its collaborators
pub struct Inventory {
    store: InventoryStore,
    repo: Arc<dyn ItemRepository>,
    blobs: Arc<dyn BlobStore>,
    config: InventoryConfig,
}

impl Inventory {
    pub fn new(repo: Arc<dyn ItemRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self::with_config(repo, blobs, InventoryConfig::default())
    }

    pub fn with_config(repo: Arc<dyn ItemRepository>, blobs: Arc<dyn BlobStore>, config: InventoryConfig) -> Self {
        Self {
            store: InventoryStore::default(),
            repo,
            blobs,
            config,
        }
    }

    /// Start from an already fetched collection
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.store = InventoryStore::new(items);
        self
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn items(&self) -> Vec<Item> {
        self.store.items()
    }

    pub fn get(&self, id: &ItemId) -> Option<Item> {
        self.store.get(id)
    }

    // ========================
    // Queries
    // ========================

    pub fn children_of(&self, parent_id: Option<&ItemId>) -> Vec<Item> {
        self.store
            .read(|tree| tree.children_of(parent_id).into_iter().cloned().collect())
    }

    pub fn root_items(&self) -> Vec<Item> {
        self.children_of(None)
    }

    pub fn descendant_ids(&self, id: &ItemId) -> Vec<ItemId> {
        self.store.read(|tree| tree.descendant_ids(id))
    }

    pub fn ancestor_chain(&self, id: &ItemId) -> Vec<Item> {
        self.store
            .read(|tree| tree.ancestor_chain(id).into_iter().cloned().collect())
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.store.read(|tree| search(tree, query))
    }

    pub fn focus_path(&self, target: &ItemId) -> HashSet<ItemId> {
        self.store.read(|tree| focus_path(tree, target))
    }

    /// Focus path of the configured deep-link target
    pub fn configured_focus(&self) -> HashSet<ItemId> {
        self.store
            .read(|tree| resolve_focus(tree, self.config.focus_item.as_ref()))
    }

    /// Display rows; the configured focus path is always expanded
    pub fn visible_rows(&self, collapsed: &HashSet<ItemId>) -> Vec<(Item, usize)> {
        let focus = self.configured_focus();
        self.store.read(|tree| {
            tree.flatten(collapsed, &focus)
                .into_iter()
                .map(|(item, depth)| (item.clone(), depth))
                .collect()
        })
    }

    pub fn location_options(&self) -> Vec<LocationOption> {
        self.store.read(|tree| tree.location_options())
    }

    /// The stored item a command is about to touch. Items still waiting on
    /// their first save are refused: their id means nothing to the store.
    fn saved_item(&self, id: &ItemId) -> DomainResult<Item> {
        if id.is_provisional() {
            return Err(DomainError::Unsaved(id.clone()));
        }
        self.store.get(id).ok_or_else(|| DomainError::NotFound(id.clone()))
    }

    /// Remove a stored photo, ignoring failures (it may already be gone)
    async fn discard_photo(&self, reference: &str) {
        if let Err(e) = self.blobs.remove(reference).await {
            warn!("photo cleanup failed for {}: {}", reference, e);
        }
    }
}
