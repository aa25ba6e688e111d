// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::Result;
use duckdb::Connection;
use tablefs::{Backend, Context, DuckBackend, EntryType, Error, Node};
use tempfile::tempdir;

fn backend_with(sql: &str) -> Result<DuckBackend> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(sql)?;
    Ok(DuckBackend::from_connection(conn))
}

fn mount(backend: DuckBackend) -> Node {
    Node::root(Context::new(Arc::new(backend)))
}

fn sorted(names: Vec<&str>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().map(String::from).collect();
    names.sort();
    names
}

const USERS_ORDERS: &str = "
    CREATE TABLE users (id BIGINT, name VARCHAR);
    INSERT INTO users VALUES (1, 'ada'), (2, 'grace'), (3, 'edsger');
    CREATE TABLE orders (id BIGINT, total DOUBLE);
";

#[tokio::test]
async fn test_catalog_and_records() -> Result<()> {
    let backend = backend_with(USERS_ORDERS)?;

    let collections = backend.fetch_collections().await?;
    assert_eq!(collections, vec!["orders", "users"]);

    let mut ids = backend.enumerate_records("users").await?;
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(backend.enumerate_records("orders").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_namespace_over_duckdb() -> Result<()> {
    let root = mount(backend_with(USERS_ORDERS)?);

    let listing = root.list().await?;
    assert_eq!(sorted(listing.names()), vec!["orders", "users"]);
    assert!(listing.iter().all(|e| e.entry_type == EntryType::Directory));

    let users = root.lookup("users")?;
    let listing = users.list().await?;
    assert_eq!(sorted(listing.names()), vec!["1.sql", "2.sql", "3.sql"]);
    assert!(listing.iter().all(|e| e.entry_type == EntryType::File));

    assert!(users.lookup("2.sql").is_ok());
    assert!(users.lookup("4.sql").is_err());
    assert!(root.lookup("missing").is_err());
    Ok(())
}

#[tokio::test]
async fn test_undecodable_rows_are_skipped() -> Result<()> {
    let backend = backend_with(
        "CREATE TABLE t (id BIGINT); INSERT INTO t VALUES (1), (NULL), (3);",
    )?;
    let mut ids = backend.enumerate_records("t").await?;
    ids.sort();
    assert_eq!(ids, vec![1, 3]);
    Ok(())
}

#[tokio::test]
async fn test_missing_id_column_is_backend_error() -> Result<()> {
    let root = mount(backend_with("CREATE TABLE notes (body VARCHAR);")?);
    root.list().await?;

    let notes = root.lookup("notes")?;
    assert!(matches!(notes.list().await, Err(Error::BackendQuery(_))));
    Ok(())
}

#[tokio::test]
async fn test_adversarial_table_names_never_leak() -> Result<()> {
    let evil = [
        "users\" UNION SELECT id FROM \"secrets",
        "bad`name",
        "o'rders",
    ];

    let mut sql = String::from(
        "CREATE TABLE users (id BIGINT); INSERT INTO users VALUES (1);
         CREATE TABLE secrets (id BIGINT); INSERT INTO secrets VALUES (99);",
    );
    for name in evil {
        let quoted = name.replace('"', "\"\"");
        sql.push_str(&format!("CREATE TABLE \"{quoted}\" (id BIGINT); INSERT INTO \"{quoted}\" VALUES (7);"));
    }
    let root = mount(backend_with(&sql)?);

    let listing = root.list().await?;
    assert_eq!(listing.len(), 2 + evil.len());

    for name in evil {
        let dir = root.lookup(name)?;
        match dir.list().await {
            Err(Error::InvalidCollectionName(n)) => assert_eq!(n, name),
            other => panic!("{name:?} listed: {other:?}"),
        }
        assert!(dir.lookup("99.sql").is_err());
        assert!(dir.lookup("7.sql").is_err());
    }

    // Nothing was dropped or altered along the way.
    let secrets = root.lookup("secrets")?;
    assert_eq!(secrets.list().await?.names(), vec!["99.sql"]);
    let users = root.lookup("users")?;
    assert_eq!(users.list().await?.names(), vec!["1.sql"]);
    Ok(())
}

#[tokio::test]
async fn test_file_dsn_opens_read_only() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("catalog.duckdb");
    {
        let conn = Connection::open(&path)?;
        conn.execute_batch(USERS_ORDERS)?;
    }

    let dsn = path.to_string_lossy().to_string();
    let root = Node::mount(&dsn)?;
    assert_eq!(sorted(root.list().await?.names()), vec!["orders", "users"]);
    Ok(())
}

#[test]
fn test_unopenable_dsn_is_mount_failure() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("no/such/dir/catalog.duckdb");
    let dsn = path.to_string_lossy().to_string();

    match Node::mount(&dsn) {
        Err(Error::MountFailure(_)) => Ok(()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_empty_dsn_is_in_memory() -> Result<()> {
    let root = Node::mount("")?;
    assert!(root.kind().is_root());
    Ok(())
}
