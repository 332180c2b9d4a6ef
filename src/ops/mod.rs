//! The file-operations layer: one module per verb family.

mod attrs;
mod copy;
mod create;
mod delete;
mod link;
mod open;
mod read_dir;
mod rename;
mod symlink;

pub use open::OpenOptions;
pub use read_dir::DirEntryInfo;

use std::sync::Arc;

use crate::attr::AttrValue;
use crate::error::{FsError, Result};
use crate::file::File;
use crate::path::MemPath;
use crate::state::FsState;

/// Options for [`crate::Filesystem::copy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Overwrite an existing target (an empty directory only, when the
    /// target is a directory).
    pub replace_existing: bool,
    /// Carry times and the attribute bag over to the copy.
    pub copy_attributes: bool,
    /// Copy a terminal symbolic link itself instead of its target.
    pub nofollow_links: bool,
}

/// Options for [`crate::Filesystem::rename`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOptions {
    pub replace_existing: bool,
    /// Demand an atomic move; combining with `replace_existing` fails
    /// *atomic-violation*.
    pub atomic_move: bool,
}

pub(crate) fn to_owned_attrs(attrs: &[(&str, AttrValue)]) -> Vec<(String, AttrValue)> {
    attrs.iter().map(|(spec, value)| ((*spec).to_owned(), value.clone())).collect()
}

impl FsState {
    /// Remove the resolved entry the way the delete verb does: empty-check
    /// directories, drop the self link of an unlinked directory, finalize
    /// dead nodes. Caller holds the tree write lock.
    pub(crate) fn remove_entry(
        &self,
        parent: &Arc<File>,
        name: &crate::name::Name,
        file: &Arc<File>,
        path: &MemPath,
    ) -> Result<()> {
        if file.is_directory() {
            let dir = file.dir().expect("directory kind");
            if !dir.read().is_empty() {
                return Err(FsError::DirectoryNotEmpty(path.to_string()));
            }
        }
        self.unlink_entry(parent, name)?;
        if file.is_directory() {
            file.header().nlinks -= 1;
        }
        self.finalize_if_dead(file);
        Ok(())
    }

    /// True when `dir` is `ancestor` or lies beneath it.
    pub(crate) fn is_same_or_descendant(&self, dir: &Arc<File>, ancestor: &Arc<File>) -> bool {
        let mut current = Arc::clone(dir);
        loop {
            if current.id() == ancestor.id() {
                return true;
            }
            let parent_id = match current.dir() {
                Some(table) => table.read().parent(),
                None => return false,
            };
            if parent_id == current.id() {
                return false;
            }
            current = match self.file(parent_id) {
                Some(parent) => parent,
                None => return false,
            };
        }
    }
}
