// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tablefs::Node;

pub const ROOT_INO: u64 = fuser::FUSE_ROOT_ID;

/// Maps kernel inode numbers to namespace nodes.
///
/// Inode numbers are assigned per path and never reused, so a path keeps
/// its number across listings even when the row disappears and returns.
pub struct InodeTable {
    by_path: HashMap<PathBuf, u64>,
    nodes: HashMap<u64, Node>,
    next: u64,
}

impl InodeTable {
    pub fn new(root: Node) -> Self {
        let mut by_path = HashMap::new();
        by_path.insert(root.path(), ROOT_INO);
        let mut nodes = HashMap::new();
        nodes.insert(ROOT_INO, root);
        Self {
            by_path,
            nodes,
            next: ROOT_INO + 1,
        }
    }

    pub fn get(&self, ino: u64) -> Option<&Node> {
        self.nodes.get(&ino)
    }

    /// The inode number for `path`, allocating one if needed.
    pub fn assign(&mut self, path: &Path) -> u64 {
        if let Some(ino) = self.by_path.get(path) {
            return *ino;
        }
        let ino = self.next;
        self.next += 1;
        self.by_path.insert(path.to_path_buf(), ino);
        ino
    }

    /// Records a resolved node and returns its inode number.
    pub fn insert(&mut self, node: Node) -> u64 {
        let ino = self.assign(&node.path());
        self.nodes.insert(ino, node);
        ino
    }

    /// Drops every path below `dir` whose first component is not in
    /// `keep`, along with anything beneath it. Returns how many inodes
    /// were released.
    pub fn retain_children(&mut self, dir: &Path, keep: &HashSet<&str>) -> usize {
        let stale: Vec<(PathBuf, u64)> = self
            .by_path
            .iter()
            .filter(|(path, _)| {
                path.strip_prefix(dir)
                    .ok()
                    .and_then(|rest| rest.components().next())
                    .is_some_and(|first| {
                        !keep.contains(first.as_os_str().to_string_lossy().as_ref())
                    })
            })
            .map(|(path, ino)| (path.clone(), *ino))
            .collect();

        for (path, ino) in &stale {
            self.by_path.remove(path);
            self.nodes.remove(ino);
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Inode of the parent directory; the root is its own parent.
    pub fn parent_of(&self, ino: u64) -> u64 {
        self.nodes
            .get(&ino)
            .and_then(|node| node.path().parent().map(Path::to_path_buf))
            .and_then(|parent| self.by_path.get(&parent).copied())
            .unwrap_or(ROOT_INO)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tablefs::testing::{MemoryBackend, mount_memory};

    use super::*;

    fn root() -> Node {
        mount_memory(Arc::new(MemoryBackend::new().with_collection("users", &[1])))
    }

    #[test]
    fn test_root_is_fuse_root() {
        let table = InodeTable::new(root());
        assert!(table.get(ROOT_INO).unwrap().kind().is_root());
        assert_eq!(table.parent_of(ROOT_INO), ROOT_INO);
        assert!(table.get(ROOT_INO + 1).is_none());
    }

    #[test]
    fn test_assign_is_stable() {
        let mut table = InodeTable::new(root());
        let a = table.assign(Path::new("users"));
        let b = table.assign(Path::new("orders"));
        assert_ne!(a, b);
        assert_ne!(a, ROOT_INO);
        assert_eq!(table.assign(Path::new("users")), a);
        // Assigned but not yet looked up.
        assert!(table.get(a).is_none());
    }

    #[tokio::test]
    async fn test_insert_and_parent() {
        let root = root();
        root.list().await.unwrap();
        let users = root.lookup("users").unwrap();
        users.list().await.unwrap();
        let leaf = users.lookup("1.sql").unwrap();

        let mut table = InodeTable::new(root);
        let users_ino = table.insert(users);
        let leaf_ino = table.insert(leaf);

        assert_eq!(table.parent_of(users_ino), ROOT_INO);
        assert_eq!(table.parent_of(leaf_ino), users_ino);
        let again = table.get(leaf_ino).unwrap().clone();
        assert_eq!(table.insert(again), leaf_ino);
    }

    #[tokio::test]
    async fn test_retain_children_releases_vanished_paths() {
        let root = root();
        root.list().await.unwrap();
        let users = root.lookup("users").unwrap();
        users.list().await.unwrap();
        let leaf = users.lookup("1.sql").unwrap();

        let mut table = InodeTable::new(root);
        let users_ino = table.insert(users);
        let leaf_ino = table.insert(leaf);
        table.assign(Path::new("users/2.sql"));
        table.assign(Path::new("orders"));
        assert_eq!(table.len(), 5);

        let keep: HashSet<&str> = ["2.sql"].into_iter().collect();
        assert_eq!(table.retain_children(Path::new("users"), &keep), 1);
        assert!(table.get(leaf_ino).is_none());
        assert!(table.get(users_ino).is_some());
        assert_eq!(table.len(), 4);

        // Dropping a collection takes its rows with it.
        let keep: HashSet<&str> = ["orders"].into_iter().collect();
        assert_eq!(table.retain_children(Path::new(""), &keep), 2);
        assert!(table.get(users_ino).is_none());
        assert!(table.get(ROOT_INO).is_some());
        assert_eq!(table.len(), 2);
    }
}
