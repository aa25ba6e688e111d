// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory backend for tests.
//!
//! Holds an ordered list of collections and their identifiers, counts the
//! queries it receives, and can be switched offline to simulate a dropped
//! connection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::node::{Context, Node};

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Vec<(String, Vec<i64>)>>,
    offline: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryBackend::set_collection`].
    pub fn with_collection<S: Into<String>>(self, name: S, ids: &[i64]) -> Self {
        self.set_collection(name, ids);
        self
    }

    /// Creates or replaces a collection, keeping its catalog position.
    pub fn set_collection<S: Into<String>>(&self, name: S, ids: &[i64]) {
        let name = name.into();
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        match tables.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = ids.to_vec(),
            None => tables.push((name, ids.to_vec())),
        }
    }

    pub fn drop_collection(&self, name: &str) {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(n, _)| n != name);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of queries issued so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin_query(&self) -> Result<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::backend_query("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_collections(&self) -> Result<Vec<String>> {
        self.begin_query()?;
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn enumerate_records(&self, collection: &str) -> Result<Vec<i64>> {
        self.begin_query()?;
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables
            .iter()
            .find(|(n, _)| n == collection)
            .map(|(_, ids)| ids.clone())
            .ok_or_else(|| Error::backend_query(format!("no such table: {collection}")))
    }
}

/// A root node over `backend` with a fresh index.
pub fn mount_memory(backend: Arc<MemoryBackend>) -> Node {
    Node::root(Context::new(backend))
}
