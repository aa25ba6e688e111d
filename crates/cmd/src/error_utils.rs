// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error mapping between the namespace core, anyhow and the kernel.

use anyhow::{Result, anyhow};
use tablefs::Error;

/// Extension trait for Results to provide standardized error mapping
pub trait ErrorContext<T> {
    /// Map error with a context message for common "Failed to..." patterns
    fn with_context_msg(self, msg: &str) -> Result<T>;

    /// Common error mapping for mount lifecycle operations
    fn mount_context(self, operation: &str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context_msg(self, msg: &str) -> Result<T> {
        self.map_err(|e| anyhow!("{}: {}", msg, e))
    }

    fn mount_context(self, operation: &str) -> Result<T> {
        self.with_context_msg(&format!("Failed to {}", operation))
    }
}

/// The errno reported to the kernel for a core error.
///
/// Backend failures are reported as missing entries: the host cannot
/// tell a dropped connection from a table that does not exist.
pub fn errno(err: &Error) -> i32 {
    match err {
        Error::NotFound(_) | Error::BackendQuery(_) | Error::InvalidCollectionName(_) => {
            libc::ENOENT
        }
        Error::NotADirectory(_) => libc::ENOTDIR,
        Error::MountFailure(_) => libc::EIO,
    }
}
