// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! FUSE adapter over the namespace core.
//!
//! The kernel dispatches requests to [`TableFs`], which forwards them to
//! [`Node`] operations. Listings block on the tokio runtime that owns the
//! backend tasks.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use diagnostics::{debug, error, info};
use fuser::{
    FileAttr, FileType, Filesystem, MountOption, ReplyAttr, ReplyDirectory, ReplyEmpty, ReplyEntry,
    ReplyOpen, Request,
};
use tablefs::{EntryType, Node};
use tokio::runtime::Handle;

use crate::config::MountConfig;
use crate::error_utils::{ErrorContext, errno};
use crate::inode::InodeTable;

/// One row of a directory reply: inode, kind, name.
pub type Listing = Vec<(u64, FileType, String)>;

pub struct TableFs {
    inodes: InodeTable,
    /// Listings computed at offset 0, served across later offsets.
    streams: HashMap<u64, Listing>,
    next_fh: u64,
    runtime: Handle,
    ttl: Duration,
    uid: u32,
    gid: u32,
    mounted_at: SystemTime,
}

fn file_type(entry_type: EntryType) -> FileType {
    match entry_type {
        EntryType::Directory => FileType::Directory,
        EntryType::File => FileType::RegularFile,
    }
}

impl TableFs {
    pub fn new(root: Node, runtime: Handle, config: &MountConfig) -> Self {
        Self {
            inodes: InodeTable::new(root),
            streams: HashMap::new(),
            next_fh: 1,
            runtime,
            ttl: config.ttl,
            uid: unsafe { libc::getuid() },
            gid: unsafe { libc::getgid() },
            mounted_at: SystemTime::now(),
        }
    }

    fn attr(&self, ino: u64, entry_type: EntryType) -> FileAttr {
        let kind = file_type(entry_type);
        FileAttr {
            ino,
            size: 0,
            blocks: 0,
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            crtime: self.mounted_at,
            kind,
            perm: entry_type.permissions(),
            nlink: if kind == FileType::Directory { 2 } else { 1 },
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: 512,
            flags: 0,
        }
    }

    fn node(&self, ino: u64) -> std::result::Result<&Node, i32> {
        self.inodes.get(ino).ok_or(libc::ENOENT)
    }

    pub fn do_lookup(&mut self, parent: u64, name: &str) -> std::result::Result<FileAttr, i32> {
        let child = self
            .node(parent)?
            .lookup(name)
            .map_err(|e| errno(&e))?;
        let entry_type = child.entry_type();
        let ino = self.inodes.insert(child);
        Ok(self.attr(ino, entry_type))
    }

    pub fn do_getattr(&self, ino: u64) -> std::result::Result<FileAttr, i32> {
        let entry_type = self.node(ino)?.entry_type();
        Ok(self.attr(ino, entry_type))
    }

    pub fn do_opendir(&mut self, ino: u64) -> std::result::Result<u64, i32> {
        self.node(ino)?.open_dir().map_err(|e| errno(&e))?;
        let fh = self.next_fh;
        self.next_fh += 1;
        Ok(fh)
    }

    /// Lists `ino` through the core and assigns inodes to its children.
    fn list(&mut self, ino: u64) -> std::result::Result<Listing, i32> {
        let node = self.node(ino)?.clone();
        let stream = self
            .runtime
            .block_on(node.list())
            .map_err(|e| errno(&e))?;

        let dir = node.path();
        let parent = self.inodes.parent_of(ino);
        let mut listing: Listing = vec![
            (ino, FileType::Directory, ".".to_string()),
            (parent, FileType::Directory, "..".to_string()),
        ];
        let keep: HashSet<&str> = stream.iter().map(|entry| entry.name.as_str()).collect();
        let released = self.inodes.retain_children(&dir, &keep);
        if released > 0 {
            let dir_name = dir.display().to_string();
            debug!(
                "released {released} inodes under /{dir_name}",
                released: released,
                dir_name: dir_name
            );
        }

        for entry in stream {
            let child_ino = self.inodes.assign(&dir.join(&entry.name));
            listing.push((child_ino, file_type(entry.entry_type), entry.name));
        }
        Ok(listing)
    }

    /// Entries of `ino` from `offset` on, with the offset of the next one.
    pub fn do_readdir(
        &mut self,
        ino: u64,
        fh: u64,
        offset: i64,
    ) -> std::result::Result<Vec<(u64, i64, FileType, String)>, i32> {
        if offset == 0 || !self.streams.contains_key(&fh) {
            let listing = self.list(ino)?;
            self.streams.insert(fh, listing);
        }
        let listing = self.streams.get(&fh).ok_or(libc::EBADF)?;

        let skip = usize::try_from(offset).unwrap_or(0);
        Ok(listing
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, (child, kind, name))| (*child, (i + 1) as i64, *kind, name.clone()))
            .collect())
    }

    pub fn do_releasedir(&mut self, fh: u64) {
        self.streams.remove(&fh);
    }
}

impl Filesystem for TableFs {
    fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(name) = name.to_str() else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.do_lookup(parent, name) {
            Ok(attr) => reply.entry(&self.ttl, &attr, 0),
            Err(code) => reply.error(code),
        }
    }

    fn getattr(&mut self, _req: &Request, ino: u64, reply: ReplyAttr) {
        match self.do_getattr(ino) {
            Ok(attr) => reply.attr(&self.ttl, &attr),
            Err(code) => reply.error(code),
        }
    }

    fn opendir(&mut self, _req: &Request, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.do_opendir(ino) {
            Ok(fh) => reply.opened(fh, 0),
            Err(code) => reply.error(code),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request,
        ino: u64,
        fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        match self.do_readdir(ino, fh, offset) {
            Ok(entries) => {
                for (child, next, kind, name) in entries {
                    if reply.add(child, next, kind, name) {
                        break;
                    }
                }
                reply.ok();
            }
            Err(code) => reply.error(code),
        }
    }

    fn releasedir(&mut self, _req: &Request, _ino: u64, fh: u64, _flags: i32, reply: ReplyEmpty) {
        self.do_releasedir(fh);
        reply.ok();
    }
}

fn mount_options(config: &MountConfig) -> Vec<MountOption> {
    vec![
        MountOption::RO,
        MountOption::FSName(config.fs_name.clone()),
        MountOption::Subtype("tablefs".to_string()),
        MountOption::AutoUnmount,
    ]
}

/// Opens the backend, mounts, and serves until unmounted.
///
/// A backend that cannot be opened is fatal: nothing is mounted.
pub fn run(config: MountConfig) -> Result<()> {
    let dsn = config.dsn.as_str();
    let root = match Node::mount(dsn) {
        Ok(root) => root,
        Err(e) => {
            let reason = e.to_string();
            error!("cannot open backend {dsn}: {reason}", dsn: dsn, reason: reason);
            return Err(e).mount_context("open backend");
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .mount_context("start runtime")?;

    let mountpoint = config.mountpoint.display().to_string();
    info!("mounting on {mountpoint}", mountpoint: mountpoint);
    if config.debug {
        info!("per-call debug logging enabled");
    }
    let ttl_ms = config.ttl.as_millis() as u64;
    debug!("attribute ttl {ttl_ms}ms", ttl_ms: ttl_ms);

    let fs = TableFs::new(root, runtime.handle().clone(), &config);
    fuser::mount2(fs, Path::new(&config.mountpoint), &mount_options(&config))
        .mount_context("mount")?;

    info!("unmounted {mountpoint}", mountpoint: mountpoint);
    Ok(())
}
