// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use diagnostics::{debug, warn};

use crate::backend::Backend;
use crate::dir::DirStream;
use crate::duck::DuckBackend;
use crate::entry_type::EntryType;
use crate::error::{Error, Result};
use crate::index::NamespaceIndex;
use crate::path::entry_name;
use crate::query::validate_collection;
use crate::resolver::{NodeKind, resolve};

/// State shared by every node of one mount.
pub struct Context {
    backend: Arc<dyn Backend>,
    index: Arc<NamespaceIndex>,
}

impl Context {
    /// A context with a fresh, empty index.
    pub fn new(backend: Arc<dyn Backend>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            index: Arc::new(NamespaceIndex::new()),
        })
    }
}

/// A position in the projected hierarchy.
///
/// Nodes hold no listing state of their own: listings go to the backend
/// and rebuild the shared index, lookups consult only the index.
#[derive(Clone)]
pub struct Node {
    kind: NodeKind,
    ctx: Arc<Context>,
}

impl Node {
    pub fn root(ctx: Arc<Context>) -> Self {
        Self {
            kind: NodeKind::Root,
            ctx,
        }
    }

    /// Mount-time initialization: opens the backend named by `dsn` once
    /// and returns the root node that owns it.
    pub fn mount(dsn: &str) -> Result<Self> {
        debug!("mount {dsn}", dsn: dsn);
        let backend = DuckBackend::open(dsn)?;
        Ok(Self::root(Context::new(Arc::new(backend))))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn path(&self) -> PathBuf {
        self.kind.path()
    }

    pub fn entry_type(&self) -> EntryType {
        self.kind.entry_type()
    }

    fn display_path(&self) -> String {
        format!("/{}", self.kind.path().display())
    }

    /// Validation only; no state changes.
    pub fn open_dir(&self) -> Result<()> {
        let dir = self.display_path();
        debug!("opendir {dir}", dir: dir);
        match self.kind {
            NodeKind::Root | NodeKind::Collection(_) => Ok(()),
            NodeKind::Entry(_) => Err(Error::not_a_directory(self.path())),
        }
    }

    /// Lists this directory from the backend and rebuilds the matching
    /// slice of the index.
    ///
    /// On failure the index is left as it was.
    pub async fn list(&self) -> Result<DirStream> {
        let dir = self.display_path();
        debug!("readdir {dir}", dir: dir);

        let result = match &self.kind {
            NodeKind::Root => self.list_root().await,
            NodeKind::Collection(collection) => self.list_collection(collection).await,
            NodeKind::Entry(_) => Err(Error::not_a_directory(self.path())),
        };

        if let Err(e) = &result {
            let reason = e.to_string();
            warn!("listing {dir} failed: {reason}", dir: dir, reason: reason);
        }
        result
    }

    async fn list_root(&self) -> Result<DirStream> {
        let names = self.ctx.backend.fetch_collections().await?;
        self.ctx.index.rebuild_collections(&names);

        let count = names.len();
        debug!("root lists {count} collections", count: count);
        Ok(DirStream::new(names, EntryType::Directory))
    }

    async fn list_collection(&self, collection: &str) -> Result<DirStream> {
        validate_collection(collection)?;
        let ids = self.ctx.backend.enumerate_records(collection).await?;
        self.ctx.index.rebuild_entries(collection, &ids)?;

        let count = ids.len();
        debug!("{collection} lists {count} entries", collection: collection, count: count);
        Ok(DirStream::new(
            ids.into_iter().map(entry_name),
            EntryType::File,
        ))
    }

    /// Resolves a child against the index. Never queries the backend.
    pub fn lookup(&self, name: &str) -> Result<Node> {
        let target = self.kind.path().join(name).display().to_string();
        debug!("lookup {target}", target: target);

        let kind = resolve(&self.ctx.index, &self.kind, name)?;
        Ok(Node {
            kind,
            ctx: self.ctx.clone(),
        })
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("kind", &self.kind).finish()
    }
}
