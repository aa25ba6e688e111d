// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use diagnostics::{debug, info};
use duckdb::{AccessMode, Config, Connection};

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::query;

/// DuckDB-backed catalog.
///
/// One connection is opened at mount time and shared by every node.
/// Queries run on the blocking pool, one at a time per connection.
#[derive(Clone)]
pub struct DuckBackend {
    conn: Arc<Mutex<Connection>>,
}

impl DuckBackend {
    /// Opens the database named by `dsn`.
    ///
    /// An empty DSN (or `:memory:`) opens a private in-memory database.
    /// A file DSN is opened read-only; the namespace never writes back.
    pub fn open(dsn: &str) -> Result<Self> {
        let conn = if dsn.is_empty() || dsn == ":memory:" {
            Connection::open_in_memory()
        } else {
            Config::default()
                .access_mode(AccessMode::ReadOnly)
                .and_then(|config| Connection::open_with_flags(dsn, config))
        }
        .map_err(|e| Error::mount_failure(format!("cannot open {dsn:?}: {e}")))?;

        info!("opened backend {dsn}", dsn: dsn);
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| Error::backend_query("connection lock poisoned"))?;
            f(&guard)
        })
        .await?
    }
}

/// Runs a single-column query, skipping rows whose value cannot be decoded.
fn query_column<T: duckdb::types::FromSql>(conn: &Connection, sql: &str) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, T>(0))?;

    let mut values = Vec::new();
    for row in rows {
        match row {
            Ok(v) => values.push(v),
            Err(e) => {
                let reason = e.to_string();
                debug!("skipping undecodable row: {reason}", reason: reason);
            }
        }
    }
    Ok(values)
}

#[async_trait]
impl Backend for DuckBackend {
    async fn fetch_collections(&self) -> Result<Vec<String>> {
        let sql = query::catalog_query();
        debug!("catalog query {sql}", sql: sql);
        self.run(move |conn| query_column::<String>(conn, &sql)).await
    }

    async fn enumerate_records(&self, collection: &str) -> Result<Vec<i64>> {
        let sql = query::record_ids_query(collection)?;
        debug!("record query {sql}", sql: sql);
        self.run(move |conn| query_column::<i64>(conn, &sql)).await
    }
}
