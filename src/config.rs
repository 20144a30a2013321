//! Inventory Configuration
//!
//! Loaded from a JSON file; every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use rolling_logger::LoggerConfig;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, ItemId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryConfig {
    /// Deep-link target: this item and its ancestors are kept expanded
    pub focus_item: Option<ItemId>,
    /// Ask before deleting an item that still contains other items
    pub confirm_delete_with_descendants: bool,
    /// Where log files go; no file logging when unset
    pub log_dir: Option<PathBuf>,
    pub app_name: String,
    pub logging: LoggerConfig,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            focus_item: None,
            confirm_delete_with_descendants: true,
            log_dir: None,
            app_name: "HunaPuka".to_string(),
            logging: LoggerConfig::default(),
        }
    }
}

impl InventoryConfig {
    pub fn from_json_str(json: &str) -> DomainResult<Self> {
        serde_json::from_str(json).map_err(|e| DomainError::InvalidInput(format!("config: {}", e)))
    }

    pub fn from_file(path: &Path) -> DomainResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DomainError::InvalidInput(format!("config {}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn with_focus(mut self, target: impl Into<ItemId>) -> Self {
        self.focus_item = Some(target.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::from_json_str("{}").unwrap();
        assert_eq!(config, InventoryConfig::default());
        assert!(config.confirm_delete_with_descendants);
        assert_eq!(config.focus_item, None);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "focusItem": 12,
            "confirmDeleteWithDescendants": false,
            "logging": { "level": "debug" }
        }"#;
        let config = InventoryConfig::from_json_str(json).unwrap();
        assert_eq!(config.focus_item, Some(ItemId::from(12u32)));
        assert!(!config.confirm_delete_with_descendants);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.max_files, LoggerConfig::default().max_files);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "appName": "Shed" }"#).unwrap();

        let config = InventoryConfig::from_file(&path).unwrap();
        assert_eq!(config.app_name, "Shed");
        assert!(InventoryConfig::from_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_invalid_json_is_input_error() {
        let err = InventoryConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
