// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while projecting the backend onto the namespace.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend connection is unusable or a query failed.
    #[error("Backend query failed: {0}")]
    BackendQuery(String),

    /// A collection name does not match the identifier grammar and
    /// will not be embedded into a query.
    #[error("Invalid collection name: {0:?}")]
    InvalidCollectionName(String),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The backend handle could not be established at mount time.
    #[error("Mount failed: {0}")]
    MountFailure(String),
}

impl Error {
    pub fn backend_query<S: Into<String>>(msg: S) -> Self {
        Error::BackendQuery(msg.into())
    }

    pub fn invalid_collection_name<S: AsRef<str>>(name: S) -> Self {
        Error::InvalidCollectionName(name.as_ref().to_string())
    }

    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Error::NotFound(path.as_ref().to_path_buf())
    }

    pub fn not_a_directory<P: AsRef<Path>>(path: P) -> Self {
        Error::NotADirectory(path.as_ref().to_path_buf())
    }

    pub fn mount_failure<S: Into<String>>(msg: S) -> Self {
        Error::MountFailure(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Error {
        Error::BackendQuery(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Error {
        Error::BackendQuery(format!("backend task failed: {err}"))
    }
}
