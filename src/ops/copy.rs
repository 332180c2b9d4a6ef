//! The copy verb.

use std::sync::Arc;

use tracing::debug;

use crate::error::{FsError, Result};
use crate::file::File;
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;

use super::CopyOptions;

impl Filesystem {
    /// Copy the node at `src` to `dst`.
    ///
    /// Regular files copy block contents; directories become an empty
    /// directory at the target; symbolic links are followed unless
    /// `nofollow_links` is set, in which case the link itself is copied.
    pub fn copy(&self, src: &str, dst: &str, options: &CopyOptions) -> Result<()> {
        self.state.check_open()?;
        let src = self.path(src)?;
        let dst = self.path(dst)?;
        let policy = if options.nofollow_links { LinkPolicy::NoFollow } else { LinkPolicy::Follow };

        let _tree = self.state.tree.write();
        let source = self.state.lookup(&src, policy)?.require(&src)?;
        let target = self.state.lookup(&dst, LinkPolicy::NoFollow)?;

        if let Some(existing) = &target.file {
            if Arc::ptr_eq(existing, &source) {
                return Ok(());
            }
            if !options.replace_existing {
                return Err(FsError::AlreadyExists(dst.to_string()));
            }
            let (parent, name) = target.entry(&dst)?;
            self.state.remove_entry(parent, name, existing, &dst)?;
        }
        let (parent, name) = target.entry(&dst)?;

        let copy = self.clone_node(&source)?;
        if options.copy_attributes {
            let source_header = source.header();
            let mut header = copy.header();
            header.created = source_header.created;
            header.modified = source_header.modified;
            header.accessed = source_header.accessed;
            header.attrs = source_header.attrs.clone();
        }
        self.state.link_entry(parent, name.clone(), &copy)?;
        debug!(src = %src, dst = %dst, id = copy.id(), "copied");
        Ok(())
    }

    fn clone_node(&self, source: &Arc<File>) -> Result<Arc<File>> {
        if let Some(content) = source.content() {
            let copy = self.state.new_regular_node(&[])?;
            let guard = content.read();
            let result = copy
                .content()
                .expect("regular kind")
                .write()
                .copy_from(&guard, &self.state.pool);
            if let Err(err) = result {
                // Roll the half-made node back out of the table.
                copy.free_content(&self.state.pool);
                self.state.table.remove(&copy.id());
                return Err(err);
            }
            return Ok(copy);
        }
        if source.is_directory() {
            return self.state.new_directory_node();
        }
        let target = source.symlink_target().expect("symlink kind").clone();
        self.state.new_symlink_node(target, &[])
    }
}
