// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

/// Node type identifiers for directory entries.
///
/// The namespace only ever produces directories (collections and the
/// root) and regular files (records).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file entry
    File,
    /// Directory entry
    Directory,
}

impl EntryType {
    /// Permission bits reported to the host.
    pub fn permissions(&self) -> u16 {
        match self {
            EntryType::File => 0o644,
            EntryType::Directory => 0o755,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions() {
        assert_eq!(EntryType::File.permissions(), 0o644);
        assert_eq!(EntryType::Directory.permissions(), 0o755);
    }
}
