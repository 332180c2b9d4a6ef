//! Attribute verbs.

use indexmap::IndexMap;
use tracing::debug;

use crate::attr::{AttrValue, BasicAttributes, PosixAttributes};
use crate::error::{FsError, Result};
use crate::fs::Filesystem;
use crate::lookup::LinkPolicy;

impl Filesystem {
    /// Read one attribute by spec (`"view:name"`, view defaulting to
    /// `basic`).
    pub fn get_attribute(&self, path: &str, spec: &str) -> Result<AttrValue> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, LinkPolicy::Follow)?.require(&path)?;
        self.state.attrs.get(&file, spec)
    }

    /// Set one attribute by spec.
    pub fn set_attribute(&self, path: &str, spec: &str, value: AttrValue) -> Result<()> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, LinkPolicy::Follow)?.require(&path)?;
        self.state.attrs.set(&file, spec, value, false)?;
        debug!(path = %path, spec, "attribute set");
        Ok(())
    }

    /// Read several attributes (`"view:a,b,c"`) or a whole view
    /// (`"view:*"`), in declaration order.
    pub fn read_attributes(&self, path: &str, spec: &str) -> Result<IndexMap<String, AttrValue>> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, LinkPolicy::Follow)?.require(&path)?;
        self.state.attrs.read_all(&file, spec)
    }

    /// Basic attributes of the node at `path`, following terminal links.
    pub fn metadata(&self, path: &str) -> Result<BasicAttributes> {
        self.metadata_impl(path, LinkPolicy::Follow)
    }

    /// Basic attributes without following a terminal symbolic link.
    pub fn symlink_metadata(&self, path: &str) -> Result<BasicAttributes> {
        self.metadata_impl(path, LinkPolicy::NoFollow)
    }

    fn metadata_impl(&self, path: &str, policy: LinkPolicy) -> Result<BasicAttributes> {
        self.state.check_open()?;
        let path = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, policy)?.require(&path)?;
        Ok(BasicAttributes::of(&file))
    }

    /// Owner, group and permissions together with the basic set. Requires
    /// the `posix` view.
    pub fn posix_attributes(&self, path: &str) -> Result<PosixAttributes> {
        self.state.check_open()?;
        if !self.state.attrs.supports_view("posix") {
            return Err(FsError::Unsupported("attribute view 'posix' not enabled".to_owned()));
        }
        let path = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, LinkPolicy::Follow)?.require(&path)?;
        Ok(PosixAttributes::of(&file))
    }

    /// Whether `path` resolves to a node, following terminal links. Mere
    /// absence is not an error.
    pub fn exists(&self, path: &str) -> bool {
        self.probe(path).is_some()
    }

    pub fn is_directory(&self, path: &str) -> bool {
        self.probe(path).map(|(_, dir, _)| dir).unwrap_or(false)
    }

    pub fn is_regular_file(&self, path: &str) -> bool {
        self.probe(path).map(|(regular, _, _)| regular).unwrap_or(false)
    }

    pub fn is_symlink(&self, path: &str) -> bool {
        self.probe_nofollow(path).map(|(_, _, link)| link).unwrap_or(false)
    }

    fn probe(&self, path: &str) -> Option<(bool, bool, bool)> {
        self.probe_impl(path, LinkPolicy::Follow)
    }

    fn probe_nofollow(&self, path: &str) -> Option<(bool, bool, bool)> {
        self.probe_impl(path, LinkPolicy::NoFollow)
    }

    fn probe_impl(&self, path: &str, policy: LinkPolicy) -> Option<(bool, bool, bool)> {
        if self.state.check_open().is_err() {
            return None;
        }
        let path = self.path(path).ok()?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&path, policy).ok()?.file?;
        Some((file.is_regular(), file.is_directory(), file.is_symlink()))
    }
}
