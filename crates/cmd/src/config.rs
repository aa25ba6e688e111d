// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::cli::Cli;

/// Kernel cache timeout for attributes and entries, e.g. "1s", "500ms".
pub const TTL_ENV: &str = "TABLEFS_TTL";

/// Filesystem name shown in the mount table.
pub const FSNAME_ENV: &str = "TABLEFS_FSNAME";

pub const DEFAULT_TTL: Duration = Duration::from_secs(1);
pub const DEFAULT_FSNAME: &str = "tablefs";

/// Everything needed to mount one database.
#[derive(Debug, Clone, PartialEq)]
pub struct MountConfig {
    pub mountpoint: PathBuf,
    pub dsn: String,
    pub debug: bool,
    pub ttl: Duration,
    pub fs_name: String,
}

impl MountConfig {
    pub fn new<P: Into<PathBuf>>(mountpoint: P, dsn: &str, debug: bool) -> Self {
        Self {
            mountpoint: mountpoint.into(),
            dsn: dsn.to_string(),
            debug,
            ttl: DEFAULT_TTL,
            fs_name: DEFAULT_FSNAME.to_string(),
        }
    }

    /// Builds the config from parsed flags plus the process environment.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::new(&cli.mountpoint, &cli.dsn, cli.debug).with_env(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ttl) = lookup(TTL_ENV) {
            self.ttl = parse_duration::parse(&ttl)
                .map_err(|e| anyhow!("invalid {TTL_ENV} {ttl:?}: {e}"))?;
        }
        if let Some(name) = lookup(FSNAME_ENV).filter(|n| !n.is_empty()) {
            self.fs_name = name;
        }
        Ok(self)
    }
}
