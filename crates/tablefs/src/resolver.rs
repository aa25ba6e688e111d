// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use crate::entry_type::EntryType;
use crate::error::{Error, Result};
use crate::index::{Entry, NamespaceIndex};
use crate::path::child_path;

/// Position of a node in the projected hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The mount root; its children are collections.
    Root,
    /// A collection directory; its children are entries.
    Collection(String),
    /// A record leaf. Terminal.
    Entry(Entry),
}

impl NodeKind {
    pub fn entry_type(&self) -> EntryType {
        match self {
            NodeKind::Root | NodeKind::Collection(_) => EntryType::Directory,
            NodeKind::Entry(_) => EntryType::File,
        }
    }

    /// Path relative to the mount root. The root itself is empty.
    pub fn path(&self) -> PathBuf {
        match self {
            NodeKind::Root => PathBuf::new(),
            NodeKind::Collection(name) => PathBuf::from(name),
            NodeKind::Entry(entry) => entry.path(),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, NodeKind::Root)
    }
}

/// Resolves `name` under `parent` against the index alone.
///
/// The backend is never consulted: a name resolves iff it was part of
/// the most recent listing of `parent`.
pub fn resolve(index: &NamespaceIndex, parent: &NodeKind, name: &str) -> Result<NodeKind> {
    match parent {
        NodeKind::Root => {
            if index.has_collection(name) {
                Ok(NodeKind::Collection(name.to_string()))
            } else {
                Err(Error::not_found(name))
            }
        }
        NodeKind::Collection(collection) => index
            .resolve_entry(collection, name)
            .map(NodeKind::Entry)
            .ok_or_else(|| Error::not_found(child_path(collection, name))),
        NodeKind::Entry(entry) => Err(Error::not_found(entry.path().join(name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> NamespaceIndex {
        let index = NamespaceIndex::new();
        index.rebuild_collections(["users", "orders"]);
        index.rebuild_entries("users", &[1, 2, 3]).unwrap();
        index
    }

    #[test]
    fn test_root_resolves_collections() {
        let index = index();
        let kind = resolve(&index, &NodeKind::Root, "users").unwrap();
        assert_eq!(kind, NodeKind::Collection("users".to_string()));
        assert_eq!(kind.entry_type(), EntryType::Directory);

        let err = resolve(&index, &NodeKind::Root, "missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_collection_resolves_entries() {
        let index = index();
        let users = NodeKind::Collection("users".to_string());

        let kind = resolve(&index, &users, "2.sql").unwrap();
        assert_eq!(kind.entry_type(), EntryType::File);
        assert_eq!(kind.path(), PathBuf::from("users/2.sql"));

        match resolve(&index, &users, "4.sql") {
            Err(Error::NotFound(p)) => assert_eq!(p, PathBuf::from("users/4.sql")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_collection_name_is_not_an_entry() {
        let index = index();
        let users = NodeKind::Collection("users".to_string());
        assert!(resolve(&index, &users, "orders").is_err());
        assert!(resolve(&index, &NodeKind::Root, "1.sql").is_err());
    }

    #[test]
    fn test_entry_has_no_children() {
        let index = index();
        let leaf = resolve(&index, &NodeKind::Collection("users".to_string()), "1.sql").unwrap();
        assert!(resolve(&index, &leaf, "1.sql").unwrap_err().is_not_found());
    }

    #[test]
    fn test_unlisted_collection_has_no_entries() {
        let index = index();
        let orders = NodeKind::Collection("orders".to_string());
        assert!(resolve(&index, &orders, "1.sql").is_err());
    }
}
