//! Directory listing verbs.

use crate::error::{FsError, Result};
use crate::file::FileId;
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub file_key: FileId,
    pub is_directory: bool,
    pub is_regular_file: bool,
    pub is_symbolic_link: bool,
}

impl Filesystem {
    /// Display-form child names of the directory at `path`, sorted.
    pub fn list(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.read_dir(path)?.into_iter().map(|entry| entry.name).collect())
    }

    /// Snapshot of the directory at `path` with per-entry node info.
    pub fn read_dir(&self, path: &str) -> Result<Vec<DirEntryInfo>> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, LinkPolicy::Follow)?.require(&path)?;
        let dir = file.dir().ok_or_else(|| FsError::NotADirectory(path.to_string()))?;
        let snapshot = dir.read().snapshot();

        let now = self.state.now();
        file.header().accessed = now;

        let mut entries = Vec::with_capacity(snapshot.len());
        for entry in snapshot {
            let Some(child) = self.state.file(entry.file) else {
                continue;
            };
            entries.push(DirEntryInfo {
                name: entry.name.display().to_owned(),
                file_key: child.id(),
                is_directory: child.is_directory(),
                is_regular_file: child.is_regular(),
                is_symbolic_link: child.is_symlink(),
            });
        }
        Ok(entries)
    }
}
