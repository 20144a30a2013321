//! In-Memory Repositories
//!
//! Item store and blob store kept in process memory. Ids are handed out
//! sequentially. Failures can be injected per operation, which is how the
//! rollback paths are exercised.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::{BlobStore, ItemRepository, PhotoFile, RepoResult};
use crate::domain::{Item, ItemId, ItemPatch, NewItem, Operation, RepositoryError};

#[derive(Default)]
struct Faults {
    /// Fail the next call of each listed operation
    once: Vec<Operation>,
    /// Deletes of these ids always fail
    deletes: HashSet<ItemId>,
    offline: bool,
}

impl Faults {
    fn check(&mut self, op: Operation, id: Option<&ItemId>) -> RepoResult<()> {
        if self.offline {
            return Err(RepositoryError::new("item store unreachable"));
        }
        if let Some(pos) = self.once.iter().position(|o| *o == op) {
            self.once.remove(pos);
            return Err(RepositoryError::new(format!("injected {:?} failure", op)));
        }
        if let (Operation::Delete, Some(id)) = (op, id) {
            if self.deletes.contains(id) {
                return Err(RepositoryError::new(format!("delete of {} rejected", id)));
            }
        }
        Ok(())
    }
}

struct MemoryState {
    items: Vec<Item>,
    next_id: u64,
    faults: Faults,
    calls: Vec<(Operation, Option<ItemId>)>,
}

/// In-memory implementation of the item store
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Seed the store; new ids continue after the largest numeric id
    pub fn with_items(items: Vec<Item>) -> Self {
        let next_id = items
            .iter()
            .filter_map(|i| i.id.as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        Self {
            state: Mutex::new(MemoryState {
                items,
                next_id,
                faults: Faults::default(),
                calls: Vec::new(),
            }),
        }
    }

    /// Make the next call of `op` fail
    pub async fn fail_next(&self, op: Operation) {
        self.state.lock().await.faults.once.push(op);
    }

    /// Make every delete of `id` fail
    pub async fn fail_delete_of(&self, id: impl Into<ItemId>) {
        self.state.lock().await.faults.deletes.insert(id.into());
    }

    /// Fail every call while offline
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.faults.offline = offline;
    }

    /// Stored records, in storage order
    pub async fn items(&self) -> Vec<Item> {
        self.state.lock().await.items.clone()
    }

    /// Every call received so far, including failed ones
    pub async fn calls(&self) -> Vec<(Operation, Option<ItemId>)> {
        self.state.lock().await.calls.clone()
    }
}

#[async_trait]
impl ItemRepository for MemoryRepository {
    async fn list(&self) -> RepoResult<Vec<Item>> {
        let mut state = self.state.lock().await;
        state.calls.push((Operation::Load, None));
        state.faults.check(Operation::Load, None)?;
        Ok(state.items.clone())
    }

    async fn create(&self, item: &NewItem) -> RepoResult<Item> {
        let mut state = self.state.lock().await;
        state.calls.push((Operation::Create, None));
        state.faults.check(Operation::Create, None)?;

        let id = ItemId::from(state.next_id);
        state.next_id += 1;
        let created = Item::from_new(id, item.clone());
        state.items.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push((Operation::Update, Some(id.clone())));
        state.faults.check(Operation::Update, Some(id))?;

        let item = state
            .items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| RepositoryError::new(format!("no item {}", id)))?;
        patch.apply_to(item);
        Ok(())
    }

    async fn move_item(&self, id: &ItemId, location_id: Option<&ItemId>, order: i64) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push((Operation::Move, Some(id.clone())));
        state.faults.check(Operation::Move, Some(id))?;

        let item = state
            .items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| RepositoryError::new(format!("no item {}", id)))?;
        item.location_id = location_id.cloned();
        item.order = order;
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push((Operation::Delete, Some(id.clone())));
        state.faults.check(Operation::Delete, Some(id))?;

        state.items.retain(|i| &i.id != id);
        Ok(())
    }
}

#[derive(Default)]
struct BlobState {
    objects: HashMap<String, Vec<u8>>,
    seq: u64,
    fail_uploads: bool,
    fail_removes: bool,
}

/// In-memory implementation of the photo store
#[derive(Default)]
pub struct MemoryBlobStore {
    state: Mutex<BlobState>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_uploads(&self, fail: bool) {
        self.state.lock().await.fail_uploads = fail;
    }

    pub async fn set_fail_removes(&self, fail: bool) {
        self.state.lock().await.fail_removes = fail;
    }

    pub async fn contains(&self, reference: &str) -> bool {
        self.state.lock().await.objects.contains_key(reference)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.objects.len()
    }

    /// Store an object under a fixed reference (seeding existing photos)
    pub async fn insert(&self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.state.lock().await.objects.insert(reference.into(), bytes);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, file: &PhotoFile) -> RepoResult<String> {
        let mut state = self.state.lock().await;
        if state.fail_uploads {
            return Err(RepositoryError::new("photo upload rejected"));
        }
        state.seq += 1;
        let reference = format!(
            "photos/{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            state.seq,
            file.file_name
        );
        state.objects.insert(reference.clone(), file.bytes.clone());
        Ok(reference)
    }

    async fn remove(&self, reference: &str) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if state.fail_removes {
            return Err(RepositoryError::new("photo store unreachable"));
        }
        state
            .objects
            .remove(reference)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::new(format!("no object {}", reference)))
    }
}
