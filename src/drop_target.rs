//! Drop Targets
//!
//! What a dragged item can be dropped on: another item (become its child)
//! or the root zone. Pointer tracking itself lives in the view layer.

use serde::{Deserialize, Serialize};

use crate::domain::ItemId;
use crate::tree::Tree;

/// Drop target types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// Root drop zone (become a root item)
    Root,
    /// Drop on an item (become child)
    Item(ItemId),
}

impl DropTarget {
    /// The location an item dropped here ends up in
    pub fn location(&self) -> Option<&ItemId> {
        match self {
            DropTarget::Root => None,
            DropTarget::Item(id) => Some(id),
        }
    }
}

impl From<Option<ItemId>> for DropTarget {
    fn from(location: Option<ItemId>) -> Self {
        match location {
            Some(id) => DropTarget::Item(id),
            None => DropTarget::Root,
        }
    }
}

impl<'a> Tree<'a> {
    /// Whether hovering `dragged` over `target` should highlight a drop.
    ///
    /// False for the item itself, anything inside it, its current parent,
    /// unknown or unsaved items, and unknown dragged ids.
    pub fn accepts_drop(&self, dragged: &ItemId, target: &DropTarget) -> bool {
        if dragged.is_provisional() || target.location().is_some_and(ItemId::is_provisional) {
            return false;
        }
        let Some(item) = self.get(dragged) else {
            return false;
        };
        if item.location_id.as_ref() == target.location() {
            return false;
        }
        match target {
            DropTarget::Root => true,
            DropTarget::Item(target_id) => self.contains(target_id) && !self.is_within(target_id, dragged),
        }
    }
}
