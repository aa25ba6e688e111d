// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The namespace index: collection name to current entry set.
//!
//! Every refresh is a full replace. Entry sets are immutable once built
//! and are swapped in whole under the write lock, so a concurrent
//! resolve sees either the previous set or the new one.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::path::{child_path, entry_name};

/// One record projected as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    collection: String,
    id: i64,
    name: String,
}

impl Entry {
    pub fn new<S: Into<String>>(collection: S, id: i64) -> Self {
        Self {
            collection: collection.into(),
            id,
            name: entry_name(id),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<collection>/<id>.sql`
    pub fn path(&self) -> PathBuf {
        child_path(&self.collection, &self.name)
    }
}

/// The entries of one collection as of its last listing, keyed by name.
#[derive(Debug, Default)]
pub struct EntrySet {
    entries: HashMap<String, Entry>,
}

impl EntrySet {
    fn build(collection: &str, ids: &[i64]) -> Self {
        let entries = ids
            .iter()
            .map(|&id| {
                let entry = Entry::new(collection, id);
                (entry.name.clone(), entry)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared cache consulted by every lookup.
///
/// Constructed once per mount and handed to nodes through their context.
#[derive(Debug, Default)]
pub struct NamespaceIndex {
    collections: RwLock<HashMap<String, Arc<EntrySet>>>,
}

impl NamespaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning is ignored: the map and its entry sets are only ever
    // replaced whole.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<EntrySet>>> {
        self.collections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<EntrySet>>> {
        self.collections.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the whole collection set.
    ///
    /// Collections absent from `names` are dropped together with their
    /// entry sets. Collections that survive keep the entry set of their
    /// own last listing; new ones start empty.
    pub fn rebuild_collections<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();

        let mut map = self.write();
        let rebuilt: HashMap<String, Arc<EntrySet>> = names
            .into_iter()
            .map(|name| {
                let set = map.get(&name).cloned().unwrap_or_default();
                (name, set)
            })
            .collect();
        *map = rebuilt;
    }

    /// Replaces the entry set of `collection` only.
    ///
    /// Fails with `NotFound` when the collection is not part of the
    /// current collection set; only a root listing may add collections.
    pub fn rebuild_entries(&self, collection: &str, ids: &[i64]) -> Result<()> {
        let set = Arc::new(EntrySet::build(collection, ids));

        let mut map = self.write();
        match map.get_mut(collection) {
            Some(slot) => {
                *slot = set;
                Ok(())
            }
            None => Err(Error::not_found(collection)),
        }
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Resolves `name` inside `collection` against the last listing.
    pub fn resolve_entry(&self, collection: &str, name: &str) -> Option<Entry> {
        let set = self.read().get(collection).cloned()?;
        set.get(name).cloned()
    }

    /// Current collection names, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Size of the current entry set of `collection`.
    pub fn entry_count(&self, collection: &str) -> Option<usize> {
        self.read().get(collection).map(|set| set.len())
    }
}
