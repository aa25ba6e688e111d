// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The two query shapes issued against the backend.
//!
//! Collection names arrive from the catalog and from lookups, so they
//! are untrusted. They must match [`IDENTIFIER_PATTERN`] before they are
//! embedded into a query, and the query builder quotes them as well.

use std::sync::LazyLock;

use regex::Regex;
use sea_query::{Alias, Expr, Order, PostgresQueryBuilder, Query};

use crate::error::{Error, Result};

/// Column holding the record identifier in every collection.
pub const ID_COLUMN: &str = "id";

/// Strict identifier grammar for collection names.
pub const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]{0,62}$";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern is valid"));

/// Rejects any collection name outside the identifier grammar.
///
/// The grammar is narrower than what DuckDB accepts: names longer than
/// 63 bytes, non-ASCII names and names with punctuation such as
/// `order-items` are still listed at the root, but cannot be opened.
pub fn validate_collection(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_collection_name(name))
    }
}

/// "Enumerate collections": base tables of the current schema.
pub fn catalog_query() -> String {
    Query::select()
        .column(Alias::new("table_name"))
        .from((Alias::new("information_schema"), Alias::new("tables")))
        .and_where(Expr::col(Alias::new("table_schema")).eq(Expr::cust("current_schema()")))
        .order_by(Alias::new("table_name"), Order::Asc)
        .to_string(PostgresQueryBuilder)
}

/// "Enumerate identifiers" for one collection.
pub fn record_ids_query(collection: &str) -> Result<String> {
    validate_collection(collection)?;
    Ok(Query::select()
        .column(Alias::new(ID_COLUMN))
        .from(Alias::new(collection))
        .to_string(PostgresQueryBuilder))
}
