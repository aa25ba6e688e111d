// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::Parser;

/// Tablefs mounts a database as a read-only directory tree: one
/// directory per table, one `<id>.sql` file per row.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "tablefs")]
pub struct Cli {
    /// Log every open, list and lookup call
    #[arg(long)]
    pub debug: bool,

    /// Data source name: a DuckDB database file, or empty for an
    /// in-memory database
    #[arg(long, default_value = "")]
    pub dsn: String,

    /// Directory to mount on
    pub mountpoint: PathBuf,
}
