//! Path-to-node resolution.

use std::sync::Arc;

use crate::error::{FsError, Result};
use crate::file::File;
use crate::name::Name;
use crate::path::{is_dot, is_dot_dot, MemPath};
use crate::state::FsState;

/// Whether a terminal symbolic link is followed. Intermediate links are
/// always followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPolicy {
    Follow,
    NoFollow,
}

/// Outcome of a resolver walk.
///
/// `file` is the resolved node when it exists. `name` is the final entry
/// name within `parent` when the path ends in a normal segment; verbs that
/// mutate the parent require it. A path ending at a root, `.` or `..`
/// resolves with `name == None` and `parent` aliasing the node itself.
pub(crate) struct Lookup {
    pub parent: Arc<File>,
    pub name: Option<Name>,
    pub file: Option<Arc<File>>,
}

impl Lookup {
    /// The resolved node, or *not-found*.
    pub fn require(self, path: &MemPath) -> Result<Arc<File>> {
        self.file.ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    /// The (parent, name) pair for mutation; paths without a usable final
    /// segment are rejected.
    pub fn entry(&self, path: &MemPath) -> Result<(&Arc<File>, &Name)> {
        match &self.name {
            Some(name) => Ok((&self.parent, name)),
            None => Err(FsError::InvalidArgument(format!(
                "path has no entry to operate on: '{path}'"
            ))),
        }
    }
}

impl FsState {
    /// Resolve `path` against the working directory. The caller holds the
    /// tree lock (read side is enough for resolution).
    pub(crate) fn lookup(&self, path: &MemPath, policy: LinkPolicy) -> Result<Lookup> {
        let start = if path.is_absolute() {
            let root = path.root().expect("absolute path has a root");
            self.root_by_name(root).ok_or_else(|| FsError::NotFound(path.to_string()))?
        } else {
            // The working directory is a node reference: if it has been
            // deleted, relative resolution fails even though the path
            // string may name a live file.
            self.file(self.cwd).ok_or_else(|| FsError::NotFound(path.to_string()))?
        };
        let mut depth = 0usize;
        self.walk(start, path.names(), policy, &mut depth, path)
    }

    fn walk(
        &self,
        start: Arc<File>,
        names: &[Name],
        policy: LinkPolicy,
        depth: &mut usize,
        origin: &MemPath,
    ) -> Result<Lookup> {
        let mut current = start;
        for (index, name) in names.iter().enumerate() {
            let last = index + 1 == names.len();
            if !current.is_directory() {
                return Err(FsError::NotADirectory(origin.to_string()));
            }
            if is_dot(name) {
                if last {
                    return Ok(Lookup { parent: current.clone(), name: None, file: Some(current) });
                }
                continue;
            }
            if is_dot_dot(name) {
                let parent_id = current.dir().expect("directory kind").read().parent();
                current = self
                    .file(parent_id)
                    .ok_or_else(|| FsError::NotFound(origin.to_string()))?;
                if last {
                    return Ok(Lookup { parent: current.clone(), name: None, file: Some(current) });
                }
                continue;
            }

            let child_id = {
                let dir = current.dir().expect("directory kind");
                let table = dir.read();
                table.get(name).map(|entry| entry.file)
            };
            let Some(child_id) = child_id else {
                if last {
                    return Ok(Lookup { parent: current, name: Some(name.clone()), file: None });
                }
                // Parent missing: an intermediate component is absent.
                return Err(FsError::NotFound(origin.to_string()));
            };
            let child =
                self.file(child_id).ok_or_else(|| FsError::NotFound(origin.to_string()))?;

            if child.is_symlink() && (!last || policy == LinkPolicy::Follow) {
                *depth += 1;
                if *depth > self.config.max_symlink_depth {
                    return Err(FsError::SymlinkLoop(origin.to_string()));
                }
                let target = child.symlink_target().expect("symlink kind").clone();
                let base = if target.is_absolute() {
                    let root = target.root().expect("absolute path has a root");
                    self.root_by_name(root)
                        .ok_or_else(|| FsError::NotFound(origin.to_string()))?
                } else {
                    current.clone()
                };
                let resolved = self.walk(base, target.names(), LinkPolicy::Follow, depth, origin)?;
                if last {
                    // The target's own lookup result stands in for the
                    // link, including a not-found with parent for
                    // create-through-dangling-link callers.
                    return Ok(resolved);
                }
                current = resolved
                    .file
                    .ok_or_else(|| FsError::NotFound(origin.to_string()))?;
                continue;
            }

            if last {
                return Ok(Lookup { parent: current, name: Some(name.clone()), file: Some(child) });
            }
            current = child;
        }
        // Zero remaining names: the path was a bare root or empty.
        Ok(Lookup { parent: current.clone(), name: None, file: Some(current) })
    }
}
