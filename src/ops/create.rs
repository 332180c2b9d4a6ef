//! File and directory creation verbs.

use tracing::debug;

use crate::attr::AttrValue;
use crate::error::{FsError, Result};
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;

impl Filesystem {
    /// Create an empty regular file at `path`.
    pub fn create_file(&self, path: &str) -> Result<()> {
        self.create_file_with(path, &[])
    }

    /// Create an empty regular file with initial attributes
    /// (`"view:attr"` specs applied on-create).
    pub fn create_file_with(&self, path: &str, attrs: &[(&str, AttrValue)]) -> Result<()> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.write();
        let lookup = self.state.lookup(&path, LinkPolicy::NoFollow)?;
        if lookup.file.is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        let (parent, name) = lookup.entry(&path)?;
        let file = self.state.new_regular_node(&super::to_owned_attrs(attrs))?;
        self.state.link_entry(parent, name.clone(), &file)?;
        debug!(path = %path, id = file.id(), "file created");
        Ok(())
    }

    /// Create a directory at `path`; the parent must exist.
    pub fn create_dir(&self, path: &str) -> Result<()> {
        self.create_dir_with(path, &[])
    }

    pub fn create_dir_with(&self, path: &str, attrs: &[(&str, AttrValue)]) -> Result<()> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.write();
        let lookup = self.state.lookup(&path, LinkPolicy::NoFollow)?;
        if lookup.file.is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        let (parent, name) = lookup.entry(&path)?;
        let dir = self.state.new_directory_node_with(&super::to_owned_attrs(attrs))?;
        self.state.link_entry(parent, name.clone(), &dir)?;
        debug!(path = %path, id = dir.id(), "directory created");
        Ok(())
    }

    /// Create a directory and any missing ancestors. Succeeds when the
    /// full path already names a directory.
    pub fn create_dir_all(&self, path: &str) -> Result<()> {
        self.state.check_open()?;
        let normalized = self.path(path)?.normalize().to_string();
        self.create_dir_all_inner(&normalized)
    }

    fn create_dir_all_inner(&self, path: &str) -> Result<()> {
        match self.create_dir(path) {
            Ok(()) => Ok(()),
            Err(FsError::AlreadyExists(_)) if self.is_directory(path) => Ok(()),
            Err(FsError::NotFound(_)) => {
                let parent = match self.path(path)?.parent() {
                    Some(parent) => parent.to_string(),
                    None => return Err(FsError::NotFound(path.to_owned())),
                };
                self.create_dir_all_inner(&parent)?;
                match self.create_dir(path) {
                    Ok(()) => Ok(()),
                    Err(FsError::AlreadyExists(_)) if self.is_directory(path) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}
