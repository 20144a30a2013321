//! Search Engine
//!
//! Case-insensitive substring search over name, description and id.
//! No ranking: hits come back in collection order.

use serde::Serialize;

use crate::domain::Item;
use crate::tree::Tree;

/// One search match with its location trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub item: Item,
    /// Ancestor names, outermost first
    pub breadcrumb: Vec<String>,
}

impl SearchHit {
    /// "Garage > Shelf > Drill"
    pub fn path_label(&self) -> String {
        let mut parts: Vec<&str> = self.breadcrumb.iter().map(String::as_str).collect();
        parts.push(&self.item.name);
        parts.join(" > ")
    }
}

fn matches(item: &Item, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || item.id.as_str().to_lowercase().contains(needle)
}

/// Items matching `query`. A blank query means search is inactive: no hits.
pub fn search(tree: Tree<'_>, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    tree.items()
        .iter()
        .filter(|item| matches(item, &needle))
        .map(|item| {
            let mut breadcrumb: Vec<String> = tree
                .ancestor_chain(&item.id)
                .into_iter()
                .map(|ancestor| ancestor.name.clone())
                .collect();
            breadcrumb.reverse();
            SearchHit {
                item: item.clone(),
                breadcrumb,
            }
        })
        .collect()
}
