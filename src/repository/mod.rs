//! Repository Layer
//!
//! Collaborator interfaces (item store, photo store) and in-memory implementations.

mod traits;
mod memory;

#[cfg(test)]
mod tests;

pub use traits::{BlobStore, ItemRepository, PhotoFile, RepoResult};
pub use memory::{MemoryBlobStore, MemoryRepository};
pub use crate::domain::RepositoryError;
