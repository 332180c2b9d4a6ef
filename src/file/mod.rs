//! File nodes: a shared header plus kind-specific payload.

pub mod directory;
pub mod regular;

use std::collections::HashMap;

use filetime::FileTime;
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::attr::AttrValue;
use crate::blocks::BlockPool;
use crate::path::MemPath;

use directory::DirTable;
use regular::FileContent;

/// Stable 64-bit node identity, surfaced as `basic:fileKey`.
pub type FileId = u64;

/// Mutable bookkeeping common to all node kinds.
///
/// `nlinks` counts directory entries referencing the node plus the
/// sentinel links of directories; `open_count` counts live handles. The
/// node is finalized when both reach zero.
#[derive(Debug)]
pub struct Header {
    pub nlinks: u32,
    pub open_count: u32,
    pub created: FileTime,
    pub modified: FileTime,
    pub accessed: FileTime,
    /// Stored attribute values keyed `"view:attr"`.
    pub attrs: HashMap<String, AttrValue>,
}

/// Kind-specific payload behind the per-file lock.
#[derive(Debug)]
pub enum FileKind {
    Directory(RwLock<DirTable>),
    Regular(RwLock<FileContent>),
    Symlink(MemPath),
}

/// A single filesystem node.
#[derive(Debug)]
pub struct File {
    id: FileId,
    kind: FileKind,
    header: Mutex<Header>,
}

impl File {
    fn new(id: FileId, kind: FileKind, now: FileTime) -> File {
        File {
            id,
            kind,
            header: Mutex::new(Header {
                nlinks: 0,
                open_count: 0,
                created: now,
                modified: now,
                accessed: now,
                attrs: HashMap::new(),
            }),
        }
    }

    /// New directory with its self sentinel counted.
    pub(crate) fn new_directory(id: FileId, parent: FileId, now: FileTime) -> File {
        let file = File::new(id, FileKind::Directory(RwLock::new(DirTable::new(parent))), now);
        file.header.lock().nlinks = 1;
        file
    }

    pub(crate) fn new_regular(id: FileId, now: FileTime) -> File {
        File::new(id, FileKind::Regular(RwLock::new(FileContent::new())), now)
    }

    pub(crate) fn new_symlink(id: FileId, target: MemPath, now: FileTime) -> File {
        File::new(id, FileKind::Symlink(target), now)
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, FileKind::Directory(_))
    }

    pub fn is_regular(&self) -> bool {
        matches!(self.kind, FileKind::Regular(_))
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self.kind, FileKind::Symlink(_))
    }

    pub(crate) fn dir(&self) -> Option<&RwLock<DirTable>> {
        match &self.kind {
            FileKind::Directory(table) => Some(table),
            _ => None,
        }
    }

    pub(crate) fn content(&self) -> Option<&RwLock<FileContent>> {
        match &self.kind {
            FileKind::Regular(content) => Some(content),
            _ => None,
        }
    }

    pub(crate) fn symlink_target(&self) -> Option<&MemPath> {
        match &self.kind {
            FileKind::Symlink(target) => Some(target),
            _ => None,
        }
    }

    pub(crate) fn header(&self) -> MutexGuard<'_, Header> {
        self.header.lock()
    }

    /// Current link count.
    pub fn nlinks(&self) -> u32 {
        self.header.lock().nlinks
    }

    /// Stored attribute value keyed `"view:attr"`, for attribute
    /// providers.
    pub fn stored_attr(&self, key: &str) -> Option<AttrValue> {
        self.header.lock().attrs.get(key).cloned()
    }

    /// Store an attribute value keyed `"view:attr"`, for attribute
    /// providers.
    pub fn set_stored_attr(&self, key: impl Into<String>, value: AttrValue) {
        self.header.lock().attrs.insert(key.into(), value);
    }

    /// Logical byte size; zero for directories and symbolic links.
    pub fn size(&self) -> u64 {
        match &self.kind {
            FileKind::Regular(content) => content.read().size(),
            _ => 0,
        }
    }

    /// Return all blocks to the pool. Called on finalization and on
    /// filesystem close; safe to call more than once.
    pub(crate) fn free_content(&self, pool: &BlockPool) {
        if let FileKind::Regular(content) = &self.kind {
            let blocks = content.write().take_blocks();
            pool.free(blocks);
        }
    }
}
