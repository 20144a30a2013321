//! Photo Commands
//!
//! Attach and detach photo references on a single item. Bytes live in the
//! blob store; the item only keeps references.

use log::{info, warn};

use super::Inventory;
use crate::domain::{DomainError, DomainResult, ItemId, ItemPatch, Operation};
use crate::repository::PhotoFile;

impl Inventory {
    /// Upload `file` and append its reference to the item's photos
    pub async fn attach_photo(&self, id: &ItemId, file: &PhotoFile) -> DomainResult<String> {
        self.saved_item(id)?;

        let reference = self.blobs.upload(file).await.map_err(DomainError::Photo)?;

        let snapshot = self.store.snapshot();
        let mut photos = None;
        self.store.update_item(id, |item| {
            item.photos.push(reference.clone());
            photos = Some(item.photos.clone());
        });
        let Some(photos) = photos else {
            // Deleted while the upload was in flight
            self.discard_photo(&reference).await;
            return Err(DomainError::NotFound(id.clone()));
        };

        let patch = ItemPatch {
            photos: Some(photos),
            ..ItemPatch::default()
        };
        match self.repo.update(id, &patch).await {
            Ok(()) => {
                info!("attached photo {} to item {}", reference, id);
                Ok(reference)
            }
            Err(e) => {
                self.store.restore(snapshot);
                warn!("attaching photo to {} failed, rolled back: {}", id, e);
                self.discard_photo(&reference).await;
                Err(DomainError::repository(Operation::AttachPhoto, e))
            }
        }
    }

    /// Remove one occurrence of `reference` from the item's photos
    pub async fn detach_photo(&self, id: &ItemId, reference: &str) -> DomainResult<()> {
        let item = self.saved_item(id)?;
        let Some(pos) = item.photos.iter().position(|p| p == reference) else {
            return Err(DomainError::InvalidInput(format!("item {} has no photo {}", id, reference)));
        };

        let snapshot = self.store.snapshot();
        let mut photos = item.photos;
        photos.remove(pos);
        self.store.update_item(id, |item| item.photos = photos.clone());

        let patch = ItemPatch {
            photos: Some(photos),
            ..ItemPatch::default()
        };
        match self.repo.update(id, &patch).await {
            Ok(()) => {
                info!("detached photo {} from item {}", reference, id);
                self.discard_photo(reference).await;
                Ok(())
            }
            Err(e) => {
                self.store.restore(snapshot);
                warn!("detaching photo from {} failed, rolled back: {}", id, e);
                Err(DomainError::repository(Operation::DetachPhoto, e))
            }
        }
    }
}
