//! Domain Layer - Identity and Errors
//!
//! Ids are opaque: the item store assigns them and the core never parses them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque item identifier (numeric or string, as handed out by the store)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawId")]
pub struct ItemId(String);

/// Stores hand out either string or numeric ids
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl From<RawId> for ItemId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
            // 2.0 prints as "2", matching the integer form
            RawId::Float(n) => Self(n.to_string()),
        }
    }
}

impl Serialize for ItemId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

static PROVISIONAL_SEQ: AtomicU64 = AtomicU64::new(1);

const PROVISIONAL_PREFIX: &str = "pending-";

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Local placeholder for an item the store has not acknowledged yet
    pub fn provisional() -> Self {
        let n = PROVISIONAL_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}{}", PROVISIONAL_PREFIX, n))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u32> for ItemId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Which repository call a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Load,
    Create,
    Update,
    Move,
    Delete,
    AttachPhoto,
    DetachPhoto,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Load => "load items",
            Operation::Create => "add item",
            Operation::Update => "save item",
            Operation::Move => "move item",
            Operation::Delete => "delete item",
            Operation::AttachPhoto => "add photo",
            Operation::DetachPhoto => "remove photo",
        };
        f.write_str(s)
    }
}

/// Failure reported by a collaborator (item store or blob store)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RepositoryError {
    pub message: String,
}

impl RepositoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Item {0} not found")]
    NotFound(ItemId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Item {0} is still being saved")]
    Unsaved(ItemId),

    #[error("Cannot move item {dragged} into itself or one of its own contents")]
    InvalidMove { dragged: ItemId, target: ItemId },

    #[error("Deleting item {id} also deletes {descendants} item(s) inside it; confirmation required")]
    ConfirmationRequired { id: ItemId, descendants: usize },

    #[error("Failed to {operation}: {source}")]
    Repository {
        operation: Operation,
        #[source]
        source: RepositoryError,
    },

    #[error("Failed to delete item {id}: {} of {total} deletions failed", .failed.len())]
    DeleteFailed {
        id: ItemId,
        total: usize,
        /// Ids whose remote delete failed
        failed: Vec<ItemId>,
        /// Ids already gone from the store even though the local model was restored
        deleted_remotely: Vec<ItemId>,
    },

    #[error("Failed to upload photo: {0}")]
    Photo(#[source] RepositoryError),
}

impl DomainError {
    pub fn repository(operation: Operation, source: RepositoryError) -> Self {
        DomainError::Repository { operation, source }
    }

    /// Validation errors are raised before any state change or repository call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound(_)
                | DomainError::InvalidInput(_)
                | DomainError::Unsaved(_)
                | DomainError::InvalidMove { .. }
                | DomainError::ConfirmationRequired { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_from_number_and_string() {
        assert_eq!(ItemId::from(42u32).as_str(), "42");
        assert_eq!(ItemId::from("abc").to_string(), "abc");
        assert_eq!(ItemId::from(7u32), ItemId::new("7"));
    }

    #[test]
    fn test_provisional_ids_are_unique() {
        let a = ItemId::provisional();
        let b = ItemId::provisional();
        assert_ne!(a, b);
        assert!(a.is_provisional());
        assert!(!ItemId::from(1u32).is_provisional());
    }

    #[test]
    fn test_item_id_serializes_transparently() {
        let json = serde_json::to_string(&ItemId::from("x1")).unwrap();
        assert_eq!(json, "\"x1\"");
    }

    #[test]
    fn test_item_id_accepts_numeric_json() {
        let id: ItemId = serde_json::from_str("17").unwrap();
        assert_eq!(id, ItemId::from("17"));
    }

    #[test]
    fn test_item_id_accepts_signed_and_float_json() {
        let id: ItemId = serde_json::from_str("-3").unwrap();
        assert_eq!(id.as_str(), "-3");

        let id: ItemId = serde_json::from_str("2.0").unwrap();
        assert_eq!(id, ItemId::from(2u32));

        let id: ItemId = serde_json::from_str("1.5").unwrap();
        assert_eq!(id.as_str(), "1.5");
    }

    #[test]
    fn test_validation_classification() {
        let invalid = DomainError::InvalidMove { dragged: "1".into(), target: "3".into() };
        assert!(invalid.is_validation());
        assert!(DomainError::Unsaved(ItemId::provisional()).is_validation());

        let failed = DomainError::repository(Operation::Move, RepositoryError::new("offline"));
        assert!(!failed.is_validation());
        assert_eq!(failed.to_string(), "Failed to move item: offline");
    }
}
