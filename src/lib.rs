//! HunaPuka Inventory Core
//!
//! A personal inventory as a tree of items, where any item can hold others.
//!
//! Layered architecture:
//! - domain: Item entity, ids and errors
//! - repository: Item store / photo store interfaces and in-memory implementations
//! - tree, ordering, store: the in-memory collection and its queries
//! - commands: Add, edit, move, delete and photo commands with rollback
//! - search, focus, drop_target: read-side helpers for the view layer

pub mod commands;
pub mod config;
pub mod domain;
pub mod drop_target;
pub mod focus;
pub mod ordering;
pub mod repository;
pub mod search;
pub mod store;
pub mod tree;

pub use commands::{DeleteOutcome, DeletePlan, Inventory, MoveOutcome};
pub use config::InventoryConfig;
pub use domain::{DomainError, DomainResult, Item, ItemId};
pub use drop_target::DropTarget;
pub use search::SearchHit;

use rolling_logger::{LoggerError, LoggerHandle};

/// Install file logging when the config names a log directory
pub fn init_logging(config: &InventoryConfig) -> Result<Option<LoggerHandle>, LoggerError> {
    match &config.log_dir {
        Some(dir) => rolling_logger::init_logger_with(dir.clone(), &config.app_name, config.logging.clone()).map(Some),
        None => Ok(None),
    }
}
