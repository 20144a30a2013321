//! Item Entity
//!
//! An inventory item. Any item can contain other items (single parent).

use serde::{Deserialize, Serialize};

use super::entity::ItemId;

/// An inventory item with hierarchical structure
///
/// Field names follow the item store's representation (`locationId`, `order`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, assigned by the item store
    pub id: ItemId,
    /// Display label, never blank
    pub name: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Containing item (None = root level)
    #[serde(default)]
    pub location_id: Option<ItemId>,
    /// Position within siblings (for ordering)
    #[serde(default)]
    pub order: i64,
    /// References to externally stored photos, in display order
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Item {
    /// Create a new root item with default values
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            location_id: None,
            order: 0,
            photos: Vec::new(),
        }
    }

    /// Create a new item inside another item
    pub fn new_child(id: impl Into<ItemId>, name: impl Into<String>, location_id: impl Into<ItemId>, order: i64) -> Self {
        Self {
            location_id: Some(location_id.into()),
            order,
            ..Self::new(id, name)
        }
    }

    /// Check if this is a root item (no parent)
    pub fn is_root(&self) -> bool {
        self.location_id.is_none()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub(crate) fn from_new(id: ItemId, new: NewItem) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            location_id: new.location_id,
            order: new.order,
            photos: new.photos,
        }
    }
}

/// An item as submitted for creation, before the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location_id: Option<ItemId>,
    pub order: i64,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Partial field update; unset fields are left alone by the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` clears the description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// `Some(None)` moves the item to root level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Option<ItemId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

impl ItemPatch {
    /// Apply the set fields to an item
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(location_id) = &self.location_id {
            item.location_id = location_id.clone();
        }
        if let Some(order) = self.order {
            item.order = order;
        }
        if let Some(photos) = &self.photos {
            item.photos = photos.clone();
        }
    }
}

/// Trim a user-entered name, rejecting blank ones
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Blank descriptions are stored as absent
pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_creation() {
        let item = Item::new(1u32, "Garage");
        assert_eq!(item.id, ItemId::from(1u32));
        assert_eq!(item.name, "Garage");
        assert!(item.photos.is_empty());
        assert!(item.is_root());
    }

    #[test]
    fn test_child_item_creation() {
        let child = Item::new_child(2u32, "Shelf", 1u32, 3);
        assert_eq!(child.location_id, Some(ItemId::from(1u32)));
        assert_eq!(child.order, 3);
        assert!(!child.is_root());
    }

    #[test]
    fn test_store_record_defaults() {
        let item: Item = serde_json::from_str(r#"{"id":"abc","name":"Box"}"#).unwrap();
        assert_eq!(item.location_id, None);
        assert_eq!(item.order, 0);
        assert!(item.photos.is_empty());

        let nested: Item = serde_json::from_str(r#"{"id":5,"name":"Tool","locationId":4,"order":2}"#).unwrap();
        assert_eq!(nested.location_id, Some(ItemId::from(4u32)));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ItemPatch {
            location_id: Some(None),
            order: Some(4),
            ..ItemPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "locationId": null, "order": 4 }));
    }

    #[test]
    fn test_patch_apply() {
        let mut item = Item::new(1u32, "Old").with_description("text");
        let patch = ItemPatch {
            name: Some("New".to_string()),
            description: Some(None),
            ..ItemPatch::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item.name, "New");
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_name("  Shelf "), Some("Shelf".to_string()));
        assert_eq!(normalize_name("   "), None);
        assert_eq!(normalize_description(Some("  ")), None);
        assert_eq!(normalize_description(Some(" red ")), Some("red".to_string()));
    }

    #[test]
    fn test_deserialize_signed_and_float_ids() {
        let item: Item = serde_json::from_str(r#"{"id":-3,"name":"Crate","locationId":2.0}"#).unwrap();
        assert_eq!(item.id.as_str(), "-3");
        assert_eq!(item.location_id, Some(ItemId::from(2u32)));
    }
}
