//! Focus Resolver
//!
//! A deep link names one item; its whole lineage has to stay expanded so the
//! item is visible. The target comes in as a value, never from global state.

use std::collections::HashSet;

use crate::domain::ItemId;
use crate::tree::Tree;

/// The target and all of its ancestors; empty when the target is unknown
pub fn focus_path(tree: Tree<'_>, target: &ItemId) -> HashSet<ItemId> {
    if !tree.contains(target) {
        return HashSet::new();
    }
    let mut path: HashSet<ItemId> = tree
        .ancestor_chain(target)
        .into_iter()
        .map(|item| item.id.clone())
        .collect();
    path.insert(target.clone());
    path
}

/// `focus_path` for an optional target (e.g. the configured deep link)
pub fn resolve_focus(tree: Tree<'_>, target: Option<&ItemId>) -> HashSet<ItemId> {
    target.map(|id| focus_path(tree, id)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    fn items() -> Vec<Item> {
        vec![
            Item::new(1u32, "Garage"),
            Item::new_child(2u32, "Shelf", 1u32, 0),
            Item::new_child(3u32, "Box", 2u32, 0),
            Item::new(4u32, "Attic"),
        ]
    }

    fn set(ids: &[u32]) -> HashSet<ItemId> {
        ids.iter().map(|id| ItemId::from(*id)).collect()
    }

    #[test]
    fn test_focus_includes_target_and_ancestors() {
        let items = items();
        assert_eq!(focus_path(Tree::new(&items), &3u32.into()), set(&[1, 2, 3]));
        assert_eq!(focus_path(Tree::new(&items), &4u32.into()), set(&[4]));
    }

    #[test]
    fn test_unknown_target_is_empty() {
        let items = items();
        assert!(focus_path(Tree::new(&items), &"gone".into()).is_empty());
        assert!(resolve_focus(Tree::new(&items), None).is_empty());
    }

    #[test]
    fn test_dangling_parent_gives_partial_path() {
        let items = vec![Item::new_child(1u32, "Shelf", 99u32, 0), Item::new_child(2u32, "Box", 1u32, 0)];
        assert_eq!(resolve_focus(Tree::new(&items), Some(&2u32.into())), set(&[1, 2]));
    }
}
