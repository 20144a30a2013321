//! Item Commands
//!
//! Load, add, edit, move and delete, each with rollback on store failure.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde::Serialize;

use super::Inventory;
use crate::domain::{
    normalize_description, normalize_name, DomainError, DomainResult, Item, ItemId, ItemPatch, NewItem, Operation,
};
use crate::drop_target::DropTarget;
use crate::ordering::next_order;

/// What a move did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Moved { location_id: Option<ItemId>, order: i64 },
    /// Dropped on its current location; nothing sent to the store
    Unchanged,
}

/// Everything a delete of `id` would remove, for the confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletePlan {
    pub id: ItemId,
    pub descendants: Vec<ItemId>,
}

impl DeletePlan {
    pub fn descendant_count(&self) -> usize {
        self.descendants.len()
    }

    pub fn needs_confirmation(&self) -> bool {
        !self.descendants.is_empty()
    }
}

/// Result of a completed delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// The item and everything that was inside it
    pub removed: Vec<ItemId>,
}

impl Inventory {
    /// Replace the collection with the item store's current contents
    pub async fn load(&self) -> DomainResult<usize> {
        let items = self
            .repo
            .list()
            .await
            .map_err(|e| DomainError::repository(Operation::Load, e))?;
        let count = items.len();
        self.store.replace_all(items);
        info!("loaded {} items", count);
        Ok(count)
    }

    /// Add an item at the end of `location_id` (None = root level)
    pub async fn add(&self, name: &str, location_id: Option<&ItemId>, description: Option<&str>) -> DomainResult<Item> {
        let name = normalize_name(name).ok_or_else(|| DomainError::InvalidInput("name must not be empty".to_string()))?;
        if let Some(location_id) = location_id {
            self.saved_item(location_id)?;
        }

        let snapshot = self.store.snapshot();
        let order = next_order(snapshot.items(), location_id, None);
        let new_item = NewItem {
            name,
            description: normalize_description(description),
            location_id: location_id.cloned(),
            order,
            photos: Vec::new(),
        };

        // Shown right away under a local id until the store assigns the real one
        let provisional_id = ItemId::provisional();
        self.store.add_item(Item::from_new(provisional_id.clone(), new_item.clone()));

        match self.repo.create(&new_item).await {
            Ok(created) => {
                if !self.store.replace_item(&provisional_id, created.clone()) {
                    self.store.add_item(created.clone());
                }
                info!("added item {} ({}) at order {}", created.id, created.name, created.order);
                Ok(created)
            }
            Err(e) => {
                self.store.restore(snapshot);
                warn!("add of {:?} failed, rolled back: {}", new_item.name, e);
                Err(DomainError::repository(Operation::Create, e))
            }
        }
    }

    /// Change name and description
    pub async fn edit(&self, id: &ItemId, name: &str, description: Option<&str>) -> DomainResult<Item> {
        let name = normalize_name(name).ok_or_else(|| DomainError::InvalidInput("name must not be empty".to_string()))?;
        let description = normalize_description(description);
        self.saved_item(id)?;

        let snapshot = self.store.snapshot();
        let patch = ItemPatch {
            name: Some(name),
            description: Some(description),
            ..ItemPatch::default()
        };
        self.store.update_item(id, |item| patch.apply_to(item));

        match self.repo.update(id, &patch).await {
            Ok(()) => {
                info!("edited item {}", id);
                self.store.get(id).ok_or_else(|| DomainError::NotFound(id.clone()))
            }
            Err(e) => {
                self.store.restore(snapshot);
                warn!("edit of {} failed, rolled back: {}", id, e);
                Err(DomainError::repository(Operation::Update, e))
            }
        }
    }

    /// Move `dragged` to the end of `target` (None = root level).
    ///
    /// Moving an item into itself or anything inside it is rejected before
    /// any change. Moving it to where it already is does nothing.
    pub async fn move_item(&self, dragged: &ItemId, target: Option<&ItemId>) -> DomainResult<MoveOutcome> {
        let current = self.saved_item(dragged)?;

        if let Some(target_id) = target {
            let would_cycle = target_id == dragged || self.descendant_ids(dragged).contains(target_id);
            if would_cycle {
                debug!("rejected move of {} into {}", dragged, target_id);
                return Err(DomainError::InvalidMove {
                    dragged: dragged.clone(),
                    target: target_id.clone(),
                });
            }
            self.saved_item(target_id)?;
        }

        if current.location_id.as_ref() == target {
            debug!("move of {} onto its own location ignored", dragged);
            return Ok(MoveOutcome::Unchanged);
        }

        let snapshot = self.store.snapshot();
        let order = next_order(snapshot.items(), target, Some(dragged));
        self.store.update_item(dragged, |item| {
            item.location_id = target.cloned();
            item.order = order;
        });

        match self.repo.move_item(dragged, target, order).await {
            Ok(()) => {
                info!("moved item {} to {:?} at order {}", dragged, target.map(ItemId::as_str), order);
                Ok(MoveOutcome::Moved {
                    location_id: target.cloned(),
                    order,
                })
            }
            Err(e) => {
                self.store.restore(snapshot);
                warn!("move of {} failed, rolled back: {}", dragged, e);
                Err(DomainError::repository(Operation::Move, e))
            }
        }
    }

    /// Finish a drag: move `dragged` onto a drop target
    pub async fn drop_on(&self, dragged: &ItemId, target: &DropTarget) -> DomainResult<MoveOutcome> {
        self.move_item(dragged, target.location()).await
    }

    /// What deleting `id` would take with it
    pub fn plan_delete(&self, id: &ItemId) -> DomainResult<DeletePlan> {
        self.saved_item(id)?;
        let descendants = self.descendant_ids(id);
        // A child still being added would come back as an orphan
        if let Some(pending) = descendants.iter().find(|d| d.is_provisional()) {
            return Err(DomainError::Unsaved(pending.clone()));
        }
        Ok(DeletePlan {
            id: id.clone(),
            descendants,
        })
    }

    /// Delete `id` and everything inside it.
    ///
    /// An item that still contains others needs `confirmed` (unless the
    /// config turns confirmation off). Items are deleted from the store one by
    /// one, innermost first; if any delete fails the whole local removal is
    /// undone. Store-side deletes that already succeeded are not recreated.
    pub async fn delete(&self, id: &ItemId, confirmed: bool) -> DomainResult<DeleteOutcome> {
        let plan = self.plan_delete(id)?;
        if plan.needs_confirmation() && self.config.confirm_delete_with_descendants && !confirmed {
            return Err(DomainError::ConfirmationRequired {
                id: id.clone(),
                descendants: plan.descendant_count(),
            });
        }

        let mut removed = Vec::with_capacity(plan.descendant_count() + 1);
        removed.push(plan.id);
        removed.extend(plan.descendants);
        let removed_set: HashSet<ItemId> = removed.iter().cloned().collect();

        let snapshot = self.store.snapshot();
        let photos: Vec<String> = snapshot
            .items()
            .iter()
            .filter(|item| removed_set.contains(&item.id))
            .flat_map(|item| item.photos.iter().cloned())
            .collect();
        self.store.remove_items(&removed_set);

        let mut failed = Vec::new();
        let mut deleted_remotely = Vec::new();
        for target in removed.iter().rev() {
            match self.repo.delete(target).await {
                Ok(()) => deleted_remotely.push(target.clone()),
                Err(e) => {
                    warn!("delete of {} failed: {}", target, e);
                    failed.push(target.clone());
                }
            }
        }

        if !failed.is_empty() {
            self.store.restore(snapshot);
            warn!(
                "delete of {} rolled back; {} of {} items already gone from the store",
                id,
                deleted_remotely.len(),
                removed.len()
            );
            return Err(DomainError::DeleteFailed {
                id: id.clone(),
                total: removed.len(),
                failed,
                deleted_remotely,
            });
        }

        for reference in &photos {
            self.discard_photo(reference).await;
        }
        info!("deleted item {} with {} contained items", id, removed.len() - 1);
        Ok(DeleteOutcome { removed })
    }
}
