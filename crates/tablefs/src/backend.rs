// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::error::Result;

/// The relational data source behind the namespace.
///
/// Each method issues exactly one query. Implementations must not touch
/// the namespace index; callers rebuild it from the returned values.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Catalog fetch: the current collection (table) names, in the order
    /// the backend returns them.
    async fn fetch_collections(&self) -> Result<Vec<String>>;

    /// Record enumeration: the row identifiers of one collection.
    ///
    /// `collection` has already passed [`crate::query::validate_collection`].
    async fn enumerate_records(&self, collection: &str) -> Result<Vec<i64>>;
}
