//! In-memory grouping of catalog records into path and date trees.
//!
//! Trees are derived data: they are built in one pass from a flat list,
//! never mutated afterwards, and rebuilt whenever the list changes.

mod date;
mod path;
mod selection;
mod sort;

pub use date::{capture_date, capture_instant, Bucket, DateTree};
pub use path::{split_path, DirectoryEntry, FileEntry, Listing, PathTree};
pub use selection::{common_albums, Selection};
pub use sort::{sort_items, Direction, Identified, SortKey, SortOrder, Timestamped};

use std::collections::BTreeMap;

/// A hierarchy node: the items stored at this node plus its children by key.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    path: String,
    items: Vec<T>,
    children: BTreeMap<String, Tree<T>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Tree {
            path: String::new(),
            items: Vec::new(),
            children: BTreeMap::new(),
        }
    }
}

impl<T> Tree<T> {
    /// Attach `item` at the node reached by `segments`, creating nodes on the way.
    /// Each created node records `root` followed by its segments joined with `sep`.
    pub(crate) fn insert(&mut self, segments: &[String], item: T, root: &str, sep: &str) {
        let mut node = self;
        let mut path = root.to_string();
        for (depth, segment) in segments.iter().enumerate() {
            if depth > 0 {
                path.push_str(sep);
            }
            path.push_str(segment);
            node = node.children.entry(segment.clone()).or_insert_with(|| Tree {
                path: path.clone(),
                ..Tree::default()
            });
        }
        node.items.push(item);
    }

    /// Path text of this node; empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Items stored directly at this node.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Tree<T>)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn child(&self, key: &str) -> Option<&Tree<T>> {
        self.children.get(key)
    }

    /// Walk down by `keys`; `None` as soon as one is absent.
    pub fn descend<S: AsRef<str>>(&self, keys: &[S]) -> Option<&Tree<T>> {
        keys.iter()
            .try_fold(self, |node, key| node.children.get(key.as_ref()))
    }

    pub fn is_directory(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_file(&self) -> bool {
        self.children.is_empty() && !self.items.is_empty()
    }

    /// Number of items in this subtree.
    pub fn descendant_count(&self) -> usize {
        self.items.len()
            + self
                .children
                .values()
                .map(Tree::descendant_count)
                .sum::<usize>()
    }

    /// Every item of this subtree, depth first in key order.
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.descendant_count());
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        out.extend(self.items.iter());
        for child in self.children.values() {
            child.collect_leaves(out);
        }
    }
}
