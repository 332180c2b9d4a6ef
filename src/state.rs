//! Mutable filesystem state: node table, roots, locks and lifecycle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use filetime::FileTime;
use parking_lot::RwLock;
use tracing::debug;

use crate::attr::AttributeService;
use crate::blocks::BlockPool;
use crate::config::Config;
use crate::error::{FsError, Result};
use crate::file::{File, FileId};
use crate::name::Name;
use crate::path::{MemPath, PathCtx};
use crate::time::Clock;

/// The state behind one filesystem instance.
///
/// Structural mutation of the directory graph happens under the `tree`
/// write lock; resolver walks hold the read side. Byte-level file access
/// only takes the per-file lock. Lock order is tree, then header, then
/// content, then the pool mutex; nothing acquires the tree lock while
/// holding a file lock.
pub(crate) struct FsState {
    pub(crate) config: Config,
    pub(crate) ctx: Arc<PathCtx>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) pool: BlockPool,
    pub(crate) attrs: AttributeService,
    pub(crate) tree: RwLock<()>,
    /// Node table: owns every live node. Directory entries and the working
    /// directory hold ids resolved through it; handles hold strong refs.
    pub(crate) table: DashMap<FileId, Arc<File>>,
    pub(crate) roots: Vec<(Name, FileId)>,
    pub(crate) cwd: FileId,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl FsState {
    pub(crate) fn new(config: Config, clock: Arc<dyn Clock>) -> Result<Arc<FsState>> {
        config.validate()?;
        let ctx = PathCtx::new(
            config.path_syntax,
            config.name_canonical_normalization,
            config.name_display_normalization,
            config.case_insensitive_names,
            config.path_equality_uses_canonical_form,
        );
        let pool = BlockPool::new(
            config.block_size,
            config.max_size,
            config.effective_cache_size(),
        );
        let attrs = AttributeService::new(
            &config.attribute_views,
            &config.default_attribute_values,
            &config.attribute_providers,
        )?;

        let mut state = FsState {
            config,
            ctx,
            clock,
            pool,
            attrs,
            tree: RwLock::new(()),
            table: DashMap::new(),
            roots: Vec::new(),
            cwd: 0,
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        };

        for root in state.config.roots.clone() {
            let path = state.ctx.parse(&root)?;
            if !path.is_absolute() || path.name_count() != 0 {
                return Err(FsError::InvalidArgument(format!("bad root: '{root}'")));
            }
            let name = path.root().expect("absolute path has a root").clone();
            let file = state.new_directory_node()?;
            // The root is its own parent sentinel.
            file.header().nlinks += 1;
            state.roots.push((name, file.id()));
        }

        let workdir = state.ctx.parse(&state.config.working_directory)?;
        if !workdir.is_absolute() {
            return Err(FsError::InvalidArgument(format!(
                "working directory must be absolute: '{workdir}'"
            )));
        }
        state.cwd = state.materialize_directories(&workdir)?;

        debug!(
            roots = state.roots.len(),
            working_directory = %workdir,
            "filesystem created"
        );
        Ok(Arc::new(state))
    }

    fn materialize_directories(&self, path: &MemPath) -> Result<FileId> {
        let root = path.root().expect("caller checked absoluteness");
        let mut current = self.root_by_name(root).ok_or_else(|| {
            FsError::NotFound(path.to_string())
        })?;
        for name in path.names() {
            let existing = {
                let dir = current.dir().expect("walked node is a directory");
                let table = dir.read();
                table.get(name).map(|entry| entry.file)
            };
            let next = match existing {
                Some(id) => {
                    let file = self.file(id).ok_or_else(|| FsError::NotFound(path.to_string()))?;
                    if !file.is_directory() {
                        return Err(FsError::NotADirectory(path.to_string()));
                    }
                    file
                }
                None => {
                    let child = self.new_directory_node()?;
                    self.link_entry(&current, name.clone(), &child)?;
                    child
                }
            };
            current = next;
        }
        Ok(current.id())
    }

    pub(crate) fn now(&self) -> FileTime {
        self.clock.now()
    }

    fn next_id(&self) -> FileId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(FsError::Closed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn file(&self, id: FileId) -> Option<Arc<File>> {
        self.table.get(&id).map(|entry| entry.value().clone())
    }

    pub(crate) fn root_by_name(&self, name: &Name) -> Option<Arc<File>> {
        self.roots
            .iter()
            .find(|(root, _)| root == name)
            .and_then(|(_, id)| self.file(*id))
    }

    /// Create a directory node registered in the table, initially its own
    /// parent and carrying only its self link.
    pub(crate) fn new_directory_node(&self) -> Result<Arc<File>> {
        self.new_directory_node_with(&[])
    }

    pub(crate) fn new_directory_node_with(
        &self,
        overrides: &[(String, crate::attr::AttrValue)],
    ) -> Result<Arc<File>> {
        let id = self.next_id();
        self.register(File::new_directory(id, id, self.now()), overrides)
    }

    pub(crate) fn new_regular_node(
        &self,
        overrides: &[(String, crate::attr::AttrValue)],
    ) -> Result<Arc<File>> {
        let id = self.next_id();
        self.register(File::new_regular(id, self.now()), overrides)
    }

    pub(crate) fn new_symlink_node(
        &self,
        target: MemPath,
        overrides: &[(String, crate::attr::AttrValue)],
    ) -> Result<Arc<File>> {
        let id = self.next_id();
        self.register(File::new_symlink(id, target, self.now()), overrides)
    }

    fn register(
        &self,
        file: File,
        overrides: &[(String, crate::attr::AttrValue)],
    ) -> Result<Arc<File>> {
        let file = Arc::new(file);
        self.attrs.set_initial(&file, overrides)?;
        self.table.insert(file.id(), Arc::clone(&file));
        Ok(file)
    }

    /// Add `name -> child` under `parent`. Caller holds the tree write
    /// lock.
    pub(crate) fn link_entry(&self, parent: &Arc<File>, name: Name, child: &Arc<File>) -> Result<()> {
        let dir = parent.dir().ok_or_else(|| FsError::NotADirectory(name.display().to_owned()))?;
        if !dir.write().insert(name.clone(), child.id()) {
            return Err(FsError::AlreadyExists(name.display().to_owned()));
        }
        child.header().nlinks += 1;
        if child.is_directory() {
            child.dir().expect("directory kind").write().set_parent(parent.id());
            parent.header().nlinks += 1;
        }
        let now = self.now();
        let mut header = parent.header();
        header.modified = now;
        header.accessed = now;
        Ok(())
    }

    /// Remove the entry `name` under `parent`, returning the unlinked
    /// child. Caller holds the tree write lock.
    pub(crate) fn unlink_entry(&self, parent: &Arc<File>, name: &Name) -> Result<Arc<File>> {
        let dir = parent.dir().ok_or_else(|| FsError::NotADirectory(name.display().to_owned()))?;
        let entry = dir
            .write()
            .remove(name)
            .ok_or_else(|| FsError::NotFound(name.display().to_owned()))?;
        let child = self.file(entry.file).expect("entry references a live node");
        child.header().nlinks -= 1;
        if child.is_directory() {
            parent.header().nlinks -= 1;
        }
        let now = self.now();
        let mut header = parent.header();
        header.modified = now;
        header.accessed = now;
        Ok(child)
    }

    /// Drop the node if nothing references it: no directory entries and no
    /// open handles. Blocks go back to the pool.
    pub(crate) fn finalize_if_dead(&self, file: &Arc<File>) {
        let dead = {
            let header = file.header();
            header.nlinks == 0 && header.open_count == 0
        };
        if dead {
            self.table.remove(&file.id());
            file.free_content(&self.pool);
            debug!(id = file.id(), "node finalized");
        }
    }

    /// Drop a handle's claim on the node, finalizing it when the last
    /// handle closes after the last link is gone. Synchronizes on the
    /// header mutex and the node table; the tree lock is not involved, a
    /// zero-link node has no directory entries left to resolve through.
    /// The deadness check shares the lock scope of the decrement, so only
    /// the party whose decrement reaches zero-zero finalizes.
    pub(crate) fn release_handle(&self, file: &Arc<File>) {
        let dead = {
            let mut header = file.header();
            header.open_count -= 1;
            header.nlinks == 0 && header.open_count == 0
        };
        if dead {
            self.table.remove(&file.id());
            file.free_content(&self.pool);
            debug!(id = file.id(), "node finalized");
        }
    }

    /// Mark closed and release every block. Outstanding handles observe
    /// the closed flag on their next operation.
    pub(crate) fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _tree = self.tree.write();
        for entry in self.table.iter() {
            entry.value().free_content(&self.pool);
        }
        self.table.clear();
        debug!("filesystem closed");
    }
}
