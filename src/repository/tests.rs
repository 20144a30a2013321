//! Repository Tests
//!
//! Tests for the in-memory item and photo stores.

#[cfg(test)]
mod tests {
    use crate::domain::{Item, ItemId, ItemPatch, NewItem, Operation};
    use crate::repository::{BlobStore, ItemRepository, MemoryBlobStore, MemoryRepository, PhotoFile};

    fn new_item(name: &str, location_id: Option<&str>, order: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            description: None,
            location_id: location_id.map(ItemId::from),
            order,
            photos: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let repo = MemoryRepository::new();

        let created = repo.create(&new_item("Garage", None, 0)).await.expect("Failed to create");

        assert_eq!(created.id, ItemId::from(1u32));
        assert_eq!(created.name, "Garage");
        assert_eq!(repo.items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_ids_continue_after_seed() {
        let repo = MemoryRepository::with_items(vec![Item::new(7u32, "Attic"), Item::new("abc", "Loft")]);

        let created = repo.create(&new_item("Box", Some("7"), 0)).await.unwrap();
        assert_eq!(created.id, ItemId::from(8u32));
    }

    #[tokio::test]
    async fn test_list_empty_is_not_an_error() {
        let repo = MemoryRepository::new();
        let items = repo.list().await.expect("List failed");
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_move() {
        let repo = MemoryRepository::with_items(vec![Item::new(1u32, "Garage"), Item::new(2u32, "Shelf")]);
        let id = ItemId::from(2u32);

        let patch = ItemPatch {
            name: Some("Top shelf".to_string()),
            ..ItemPatch::default()
        };
        repo.update(&id, &patch).await.expect("Update failed");
        repo.move_item(&id, Some(&ItemId::from(1u32)), 3).await.expect("Move failed");

        let items = repo.items().await;
        let shelf = items.iter().find(|i| i.id == id).unwrap();
        assert_eq!(shelf.name, "Top shelf");
        assert_eq!(shelf.location_id, Some(ItemId::from(1u32)));
        assert_eq!(shelf.order, 3);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = MemoryRepository::with_items(vec![Item::new(1u32, "Garage")]);
        let id = ItemId::from(1u32);

        repo.delete(&id).await.expect("Delete failed");
        repo.delete(&id).await.expect("Second delete failed");
        assert!(repo.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let repo = MemoryRepository::with_items(vec![Item::new(1u32, "Garage")]);

        repo.fail_next(Operation::Create).await;
        assert!(repo.create(&new_item("Box", None, 1)).await.is_err());
        assert!(repo.create(&new_item("Box", None, 1)).await.is_ok());

        repo.fail_delete_of(1u32).await;
        assert!(repo.delete(&ItemId::from(1u32)).await.is_err());
        assert!(repo.delete(&ItemId::from(1u32)).await.is_err());

        repo.set_offline(true).await;
        assert!(repo.list().await.is_err());
        assert_eq!(repo.calls().await.len(), 5);
    }

    #[tokio::test]
    async fn test_blob_upload_and_remove() {
        let blobs = MemoryBlobStore::new();

        let reference = blobs.upload(&PhotoFile::new("drill.jpg", vec![1, 2, 3])).await.unwrap();
        assert!(reference.ends_with("drill.jpg"));
        assert!(blobs.contains(&reference).await);

        blobs.remove(&reference).await.expect("Remove failed");
        assert!(!blobs.contains(&reference).await);
        assert!(blobs.remove(&reference).await.is_err());
    }
}
