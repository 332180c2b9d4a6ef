//! The hard-link verb.

use tracing::debug;

use crate::config::Feature;
use crate::error::{FsError, Result};
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;

impl Filesystem {
    /// Create a hard link at `link` to the regular file at `existing`.
    pub fn create_link(&self, link: &str, existing: &str) -> Result<()> {
        self.state.check_open()?;
        if !self.state.config.supports(Feature::Links) {
            return Err(FsError::Unsupported("hard links are not enabled".to_owned()));
        }
        let link = self.path(link)?;
        let existing = self.path(existing)?;

        let _tree = self.state.tree.write();
        // The follow resolution leaves only directories and regular files.
        let source = self.state.lookup(&existing, LinkPolicy::Follow)?.require(&existing)?;
        if source.is_directory() {
            return Err(FsError::IsADirectory(existing.to_string()));
        }
        let lookup = self.state.lookup(&link, LinkPolicy::NoFollow)?;
        if lookup.file.is_some() {
            return Err(FsError::AlreadyExists(link.to_string()));
        }
        let (parent, name) = lookup.entry(&link)?;
        self.state.link_entry(parent, name.clone(), &source)?;
        debug!(link = %link, target = %existing, id = source.id(), "hard link created");
        Ok(())
    }
}
