//! Domain Layer
//!
//! Contains the item entity, its id type and the domain errors.
//! This layer has NO external dependencies (except serde/thiserror).

mod entity;
mod item;

pub use entity::{DomainError, DomainResult, ItemId, Operation, RepositoryError};
pub use item::{normalize_description, normalize_name, Item, ItemPatch, NewItem};
