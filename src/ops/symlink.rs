//! Symbolic-link verbs.

use tracing::debug;

use crate::attr::AttrValue;
use crate::config::Feature;
use crate::error::{FsError, Result};
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;
use crate::path::MemPath;

impl Filesystem {
    /// Create a symbolic link at `path` holding `target`. The target is
    /// stored unresolved; it need not exist.
    pub fn create_symlink(&self, path: &str, target: &str) -> Result<()> {
        self.create_symlink_with(path, target, &[])
    }

    pub fn create_symlink_with(
        &self,
        path: &str,
        target: &str,
        attrs: &[(&str, AttrValue)],
    ) -> Result<()> {
        self.state.check_open()?;
        if !self.state.config.supports(Feature::SymbolicLinks) {
            return Err(FsError::Unsupported("symbolic links are not enabled".to_owned()));
        }
        let path = self.path(path)?;
        let target = self.path(target)?;

        let _tree = self.state.tree.write();
        let lookup = self.state.lookup(&path, LinkPolicy::NoFollow)?;
        if lookup.file.is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        let (parent, name) = lookup.entry(&path)?;
        let file = self.state.new_symlink_node(target, &super::to_owned_attrs(attrs))?;
        self.state.link_entry(parent, name.clone(), &file)?;
        debug!(path = %path, id = file.id(), "symlink created");
        Ok(())
    }

    /// Read the stored target of the symbolic link at `path`.
    pub fn read_symlink(&self, path: &str) -> Result<MemPath> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, LinkPolicy::NoFollow)?.require(&path)?;
        match file.symlink_target() {
            Some(target) => Ok(target.clone()),
            None => Err(FsError::InvalidArgument(format!("not a symbolic link: '{path}'"))),
        }
    }
}
