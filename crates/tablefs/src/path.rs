// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Suffix appended to every record identifier to form its file name.
pub const ENTRY_SUFFIX: &str = ".sql";

/// Renders a record identifier as an entry file name, e.g. `42.sql`.
pub fn entry_name(id: i64) -> String {
    format!("{id}{ENTRY_SUFFIX}")
}

/// Path of a child relative to the mount root: `<collection>/<name>`.
pub fn child_path(collection: &str, name: &str) -> PathBuf {
    PathBuf::from(collection).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name() {
        assert_eq!(entry_name(1), "1.sql");
        assert_eq!(entry_name(-7), "-7.sql");
        assert_eq!(entry_name(i64::MAX), "9223372036854775807.sql");
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("users", "3.sql"), PathBuf::from("users/3.sql"));
    }
}
