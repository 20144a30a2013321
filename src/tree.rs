//! Tree Model
//!
//! Read-only queries over the flat item collection. The parent relation is
//! only `location_id`; nothing here nests owned items.
//!
//! Traversals use explicit stacks and visited sets, so they terminate on
//! arbitrarily deep trees and on corrupted data (dangling or cyclic parents).

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::domain::{Item, ItemId};

/// Parent -> children map, children sorted by order (stable on ties)
type ChildrenMap<'a> = HashMap<Option<&'a ItemId>, Vec<&'a Item>>;

/// Borrowed view of the collection
#[derive(Debug, Clone, Copy)]
pub struct Tree<'a> {
    items: &'a [Item],
}

/// One entry of the "add under" location picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOption {
    pub id: ItemId,
    pub name: String,
    pub depth: usize,
}

impl<'a> Tree<'a> {
    pub fn new(items: &'a [Item]) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &'a [Item] {
        self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&'a Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    fn children_map(&self) -> ChildrenMap<'a> {
        let mut map: ChildrenMap<'a> = HashMap::new();
        for item in self.items {
            map.entry(item.location_id.as_ref()).or_default().push(item);
        }
        for children in map.values_mut() {
            children.sort_by_key(|item| item.order);
        }
        map
    }

    /// Items directly inside `parent_id` (None = root level), by order
    pub fn children_of(&self, parent_id: Option<&ItemId>) -> Vec<&'a Item> {
        let mut children: Vec<&'a Item> = self
            .items
            .iter()
            .filter(|item| item.location_id.as_ref() == parent_id)
            .collect();
        children.sort_by_key(|item| item.order);
        children
    }

    pub fn root_items(&self) -> Vec<&'a Item> {
        self.children_of(None)
    }

    /// Number of items directly inside `id`
    pub fn child_count(&self, id: &ItemId) -> usize {
        self.items
            .iter()
            .filter(|item| item.location_id.as_ref() == Some(id))
            .count()
    }

    /// Every id transitively inside `id`, excluding `id` itself.
    /// Depth-first, siblings in display order.
    pub fn descendant_ids(&self, id: &ItemId) -> Vec<ItemId> {
        let map = self.children_map();
        let mut result = Vec::new();
        let mut visited: HashSet<&ItemId> = HashSet::new();
        visited.insert(id);

        let mut stack: Vec<&ItemId> = vec![id];
        while let Some(current) = stack.pop() {
            let Some(children) = map.get(&Some(current)) else {
                continue;
            };
            // Reversed so the first child is popped first
            for child in children.iter().rev() {
                if visited.insert(&child.id) {
                    stack.push(&child.id);
                }
            }
            if current != id {
                result.push(current.clone());
            }
        }
        debug!("descendants of {}: {}", id, result.len());
        result
    }

    /// Ancestors of `id`, immediate parent first, root last.
    /// Stops at root level, at a dangling reference, or where the chain loops.
    pub fn ancestor_chain(&self, id: &ItemId) -> Vec<&'a Item> {
        let by_id: HashMap<&ItemId, &'a Item> = self.items.iter().map(|item| (&item.id, item)).collect();
        let mut chain = Vec::new();
        let mut seen: HashSet<&ItemId> = HashSet::new();
        seen.insert(id);

        let mut next = by_id.get(id).and_then(|item| item.location_id.as_ref());
        while let Some(parent_id) = next {
            if !seen.insert(parent_id) {
                debug!("ancestor chain of {} loops at {}", id, parent_id);
                break;
            }
            let Some(parent) = by_id.get(parent_id) else {
                debug!("ancestor chain of {} stops at missing item {}", id, parent_id);
                break;
            };
            chain.push(*parent);
            next = parent.location_id.as_ref();
        }
        chain
    }

    /// True if `candidate` is `id` or lies somewhere inside it
    pub fn is_within(&self, candidate: &ItemId, id: &ItemId) -> bool {
        candidate == id || self.ancestor_chain(candidate).iter().any(|a| &a.id == id)
    }

    /// Items as indented rows in display order.
    ///
    /// Children of ids in `collapsed` are hidden, unless the id is on the
    /// focus path, which is always kept open.
    pub fn flatten(&self, collapsed: &HashSet<ItemId>, focus: &HashSet<ItemId>) -> Vec<(&'a Item, usize)> {
        let map = self.children_map();
        let mut result = Vec::new();
        let mut visited: HashSet<&ItemId> = HashSet::new();

        let mut stack: Vec<(&'a Item, usize)> = Vec::new();
        if let Some(roots) = map.get(&None) {
            stack.extend(roots.iter().rev().map(|item| (*item, 0)));
        }
        while let Some((item, depth)) = stack.pop() {
            if !visited.insert(&item.id) {
                continue;
            }
            result.push((item, depth));

            let open = !collapsed.contains(&item.id) || focus.contains(&item.id);
            if !open {
                continue;
            }
            if let Some(children) = map.get(&Some(&item.id)) {
                stack.extend(children.iter().rev().map(|child| (*child, depth + 1)));
            }
        }
        result
    }

    /// Every item as a picker entry, depth-first in display order
    pub fn location_options(&self) -> Vec<LocationOption> {
        self.flatten(&HashSet::new(), &HashSet::new())
            .into_iter()
            .map(|(item, depth)| LocationOption {
                id: item.id.clone(),
                name: item.name.clone(),
                depth,
            })
            .collect()
    }
}
