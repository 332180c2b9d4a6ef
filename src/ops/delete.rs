//! The delete verb.

use tracing::debug;

use crate::error::{FsError, Result};
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;

impl Filesystem {
    /// Remove the entry at `path`. A symbolic link is removed itself, not
    /// its target. Directories must be empty. The node is finalized when
    /// its last link and last open handle are gone.
    pub fn delete(&self, path: &str) -> Result<()> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.write();
        let lookup = self.state.lookup(&path, LinkPolicy::NoFollow)?;
        let file = match &lookup.file {
            Some(file) => file.clone(),
            None => return Err(FsError::NotFound(path.to_string())),
        };
        let Some(name) = &lookup.name else {
            // A root, `.` or `..` resolution: nothing legal to unlink.
            return if self.state.roots.iter().any(|(_, id)| *id == file.id()) {
                Err(FsError::AccessDenied(format!("cannot delete the root directory '{path}'")))
            } else {
                Err(FsError::InvalidArgument(format!("cannot delete '{path}'")))
            };
        };
        self.state.remove_entry(&lookup.parent, name, &file, &path)?;
        debug!(path = %path, id = file.id(), "entry deleted");
        Ok(())
    }
}
