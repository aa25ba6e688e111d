// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Projects a relational database onto a read-only directory tree.
//!
//! Tables appear as directories under the root and row identifiers as
//! `<id>.sql` files inside them. Listing a directory queries the backend
//! and rebuilds the shared [`NamespaceIndex`]; looking a name up consults
//! only the index.

mod backend;
mod dir;
mod duck;
mod entry_type;
mod error;
mod index;
mod node;
mod path;
pub mod query;
mod resolver;
pub mod testing;

pub use backend::Backend;
pub use dir::{DirEntry, DirStream};
pub use duck::DuckBackend;
pub use entry_type::EntryType;
pub use error::{Error, Result};
pub use index::{Entry, EntrySet, NamespaceIndex};
pub use node::{Context, Node};
pub use path::{ENTRY_SUFFIX, child_path, entry_name};
pub use resolver::{NodeKind, resolve};

#[cfg(test)]
mod tests;
