//! Directory entry tables.

use std::collections::HashMap;

use crate::name::Name;

use super::FileId;

/// One child entry: a name → id reference resolved through the node table.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: Name,
    pub file: FileId,
}

/// Child entries of one directory.
///
/// The `self` and `parent` sentinels are not stored as entries: `self` is
/// implicit and `parent` is the dedicated field (the root points at
/// itself). Structural mutation happens only under the filesystem tree
/// write lock.
#[derive(Debug)]
pub struct DirTable {
    parent: FileId,
    entries: HashMap<Name, DirEntry>,
}

impl DirTable {
    pub fn new(parent: FileId) -> Self {
        Self { parent, entries: HashMap::new() }
    }

    pub fn parent(&self) -> FileId {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: FileId) {
        self.parent = parent;
    }

    pub fn get(&self, name: &Name) -> Option<&DirEntry> {
        self.entries.get(name)
    }

    /// Insert an entry; `false` if the name is already present.
    pub(crate) fn insert(&mut self, name: Name, file: FileId) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name.clone(), DirEntry { name, file });
        true
    }

    pub(crate) fn remove(&mut self, name: &Name) -> Option<DirEntry> {
        self.entries.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable copy of the entries for iteration under a read lock, ordered
    /// by display name.
    pub fn snapshot(&self) -> Vec<DirEntry> {
        let mut entries: Vec<DirEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.name.display().cmp(b.name.display()));
        entries
    }
}
