//! Repository Layer - Collaborator Traits
//!
//! Abstract interfaces for the remote item store and the photo blob store.
//! Implementations can be a hosted document store, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{Item, ItemId, ItemPatch, NewItem, RepositoryError};

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Remote item store for one user's inventory
///
/// All operations are async and may fail; the core treats every failure
/// (including timeouts surfaced by the implementation) the same way.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Full collection for the current user; no data is `[]`, not an error
    async fn list(&self) -> RepoResult<Vec<Item>>;

    /// Store a new item and return the canonical record with its assigned id
    async fn create(&self, item: &NewItem) -> RepoResult<Item>;

    /// Apply a partial field update
    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> RepoResult<()>;

    /// Reparent an item
    async fn move_item(&self, id: &ItemId, location_id: Option<&ItemId>, order: i64) -> RepoResult<()> {
        let patch = ItemPatch {
            location_id: Some(location_id.cloned()),
            order: Some(order),
            ..ItemPatch::default()
        };
        self.update(id, &patch).await
    }

    /// Delete one item (not its contents). Deleting a missing id is not special.
    async fn delete(&self, id: &ItemId) -> RepoResult<()>;
}

/// A photo picked by the user, not yet uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Binary object store for photos
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a file and return the reference stored on the item
    async fn upload(&self, file: &PhotoFile) -> RepoResult<String>;

    /// Remove an uploaded object; callers treat failure as best-effort
    async fn remove(&self, reference: &str) -> RepoResult<()>;
}
