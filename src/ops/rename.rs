//! The move verb.

use std::sync::Arc;

use tracing::debug;

use crate::error::{FsError, Result};
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;

use super::MoveOptions;

impl Filesystem {
    /// Move the entry at `src` to `dst` within this filesystem: the new
    /// link appears and the old one vanishes under one hold of the tree
    /// write lock, so no observer sees a half-applied move. Open handles
    /// into a moved subtree keep working; file keys are preserved.
    pub fn rename(&self, src: &str, dst: &str, options: &MoveOptions) -> Result<()> {
        self.state.check_open()?;
        let src = self.path(src)?;
        let dst = self.path(dst)?;
        if options.atomic_move && options.replace_existing {
            return Err(FsError::AtomicViolation(src.to_string(), dst.to_string()));
        }

        let _tree = self.state.tree.write();
        let source = self.state.lookup(&src, LinkPolicy::NoFollow)?;
        let file = match &source.file {
            Some(file) => file.clone(),
            None => return Err(FsError::NotFound(src.to_string())),
        };
        let (src_parent, src_name) = {
            let (parent, name) = source.entry(&src)?;
            (parent.clone(), name.clone())
        };

        let target = self.state.lookup(&dst, LinkPolicy::NoFollow)?;
        if let Some(existing) = &target.file {
            if Arc::ptr_eq(existing, &file) {
                return Ok(());
            }
            if !options.replace_existing {
                return Err(FsError::AlreadyExists(dst.to_string()));
            }
            let (parent, name) = target.entry(&dst)?;
            self.state.remove_entry(parent, name, existing, &dst)?;
        }
        let (dst_parent, dst_name) = {
            let (parent, name) = target.entry(&dst)?;
            (parent.clone(), name.clone())
        };

        if file.is_directory() && self.state.is_same_or_descendant(&dst_parent, &file) {
            return Err(FsError::InvalidArgument(format!(
                "cannot move '{src}' into its own subtree '{dst}'"
            )));
        }

        self.state.unlink_entry(&src_parent, &src_name)?;
        self.state.link_entry(&dst_parent, dst_name, &file)?;
        debug!(src = %src, dst = %dst, id = file.id(), "moved");
        Ok(())
    }
}
