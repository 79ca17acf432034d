//! Conversion between configuration trees and flat store paths.
//!
//! A tree pushed under `<basefolder>/<label>` becomes one store key per
//! leaf, segments joined with `/` and taken verbatim from the tree keys.
//! No escaping is performed: a tree key containing `/` is a caller error.
//!
//! ```
//! use kv_config::{path, Tree};
//!
//! let mut tree = std::collections::BTreeMap::new();
//! tree.insert("port".to_string(), Tree::scalar("8080"));
//! let entries = path::flatten(&Tree::Mapping(tree), "/config/app");
//!
//! assert_eq!(entries[0].key, "/config/app/port");
//! assert_eq!(entries[0].value, "8080");
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::Error;
use crate::tree::Tree;

/// One store write produced by [`flatten`]: a full slash-joined key and the
/// scalar value stored there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub key: String,
    pub value: String,
}

/// Walks `tree` depth-first and emits one [`FlatEntry`] per scalar leaf,
/// rooted at `base`.
///
/// The order of entries follows the deterministic mapping order of the
/// tree. Empty mappings produce no entries, so they do not survive a round
/// trip through the store.
pub fn flatten(tree: &Tree, base: &str) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    walk(tree, base.to_string(), &mut entries);
    entries
}

fn walk(tree: &Tree, path: String, entries: &mut Vec<FlatEntry>) {
    match tree {
        Tree::Scalar(value) => entries.push(FlatEntry {
            key: path,
            value: value.clone(),
        }),
        Tree::Mapping(map) => {
            for (key, child) in map {
                walk(child, format!("{path}/{key}"), entries);
            }
        }
    }
}

/// Rebuilds a tree from `(key, value)` pairs read below `base`.
///
/// The `base` prefix is stripped from each key and the remaining segments
/// are inserted into a mapping, intermediate segments as mappings and the
/// last segment as a scalar leaf. Entries whose stripped path is empty are
/// ignored, and an empty input yields the empty configuration.
///
/// Fails with [`Error::Corruption`] when a key is needed both as a value
/// and as a folder: the stored data was not produced by a consistent
/// flatten, or a prior push was interrupted partway.
pub fn unflatten<I>(entries: I, base: &str) -> Result<Tree, Error>
where
    I: IntoIterator<Item = (String, String)>,
{
    let below = format!("{base}/");
    let mut root = BTreeMap::new();

    for (key, value) in entries {
        let Some(rest) = key.strip_prefix(&below) else {
            continue;
        };
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }
        insert(&mut root, &key, &segments, value)?;
    }

    Ok(Tree::Mapping(root))
}

fn insert(
    root: &mut BTreeMap<String, Tree>,
    key: &str,
    segments: &[&str],
    value: String,
) -> Result<(), Error> {
    let mut node = root;
    for segment in &segments[..segments.len() - 1] {
        let child = node
            .entry((*segment).to_string())
            .or_insert_with(Tree::mapping);
        node = match child {
            Tree::Mapping(map) => map,
            Tree::Scalar(_) => {
                return Err(Error::Corruption(format!(
                    "'{segment}' along '{key}' is stored both as a value and as a folder"
                )));
            }
        };
    }

    let leaf = segments[segments.len() - 1];
    match node.entry(leaf.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(Tree::Scalar(value));
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Tree::Mapping(_) => {
                return Err(Error::Corruption(format!(
                    "'{key}' is stored both as a value and as a folder"
                )));
            }
            // duplicate key in the input, last value wins
            leaf @ Tree::Scalar(_) => *leaf = Tree::Scalar(value),
        },
    }

    Ok(())
}
