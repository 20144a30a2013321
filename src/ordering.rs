//! Ordering Policy
//!
//! Sibling positions within a location. New and moved items always go to
//! the end of their location; inserting between siblings is not supported.

use crate::domain::{Item, ItemId};

/// Next order value under `location_id`: one past the largest sibling order, or 0.
///
/// `excluding` leaves one item out of the siblings, so an item being moved
/// is not counted against its own new position.
pub fn next_order(items: &[Item], location_id: Option<&ItemId>, excluding: Option<&ItemId>) -> i64 {
    items
        .iter()
        .filter(|item| item.location_id.as_ref() == location_id)
        .filter(|item| Some(&item.id) != excluding)
        .map(|item| item.order)
        .max()
        .map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<Item> {
        vec![
            Item::new(1u32, "Garage"),
            Item::new_child(2u32, "Shelf", 1u32, 4),
            Item::new_child(3u32, "Bench", 1u32, 7),
            Item::new(4u32, "Attic").with_order(2),
        ]
    }

    #[test]
    fn test_empty_location_starts_at_zero() {
        assert_eq!(next_order(&items(), Some(&2u32.into()), None), 0);
        assert_eq!(next_order(&[], None, None), 0);
    }

    #[test]
    fn test_appends_after_max() {
        let items = items();
        assert_eq!(next_order(&items, Some(&1u32.into()), None), 8);
        assert_eq!(next_order(&items, None, None), 3);
    }

    #[test]
    fn test_excluding_moved_item() {
        let items = items();
        assert_eq!(next_order(&items, Some(&1u32.into()), Some(&3u32.into())), 5);
        assert_eq!(next_order(&items, Some(&1u32.into()), Some(&9u32.into())), 8);
    }

    #[test]
    fn test_negative_orders() {
        let items = vec![Item::new(1u32, "A").with_order(-3), Item::new(2u32, "B").with_order(-5)];
        assert_eq!(next_order(&items, None, None), -2);
    }
}
