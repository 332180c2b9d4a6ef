//! The `unix` attribute view (read-only).

use dashmap::DashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::error::{FsError, Result};
use crate::file::File;

use super::{AttrValue, AttributeProvider, PosixPermission};

const ATTRIBUTES: &[&str] = &["uid", "gid", "mode", "ctime", "ino", "dev", "rdev", "nlink"];

/// Provider for unix-level attributes, derived from the posix and owner
/// views plus node bookkeeping. Every attribute is read-only.
pub struct UnixProvider {
    // Principal name -> assigned numeric id, stable per filesystem instance.
    ids: DashMap<String, i32>,
    next_id: AtomicI32,
}

impl UnixProvider {
    pub fn new() -> Self {
        Self { ids: DashMap::new(), next_id: AtomicI32::new(0) }
    }

    fn principal_id(&self, name: &str) -> i32 {
        *self
            .ids
            .entry(name.to_owned())
            .or_insert_with(|| self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for UnixProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeProvider for UnixProvider {
    fn name(&self) -> &str {
        "unix"
    }

    fn inherits(&self) -> &[&str] {
        &["basic", "owner", "posix"]
    }

    fn list(&self, _file: &File) -> Vec<String> {
        ATTRIBUTES.iter().map(|&a| a.to_owned()).collect()
    }

    fn supports(&self, attr: &str) -> bool {
        ATTRIBUTES.contains(&attr)
    }

    fn get(&self, file: &File, attr: &str) -> Option<AttrValue> {
        match attr {
            "uid" => {
                let header = file.header();
                let name = match header.attrs.get("owner:owner") {
                    Some(AttrValue::User(user)) => user.0.clone(),
                    _ => "user".to_owned(),
                };
                drop(header);
                Some(AttrValue::Int(self.principal_id(&name)))
            }
            "gid" => {
                let header = file.header();
                let name = match header.attrs.get("posix:group") {
                    Some(AttrValue::Group(group)) => group.0.clone(),
                    _ => "group".to_owned(),
                };
                drop(header);
                Some(AttrValue::Int(self.principal_id(&name)))
            }
            "mode" => {
                let header = file.header();
                let mode = match header.attrs.get("posix:permissions") {
                    Some(AttrValue::Permissions(perms)) => PosixPermission::to_mode(perms),
                    _ => 0o644,
                };
                Some(AttrValue::Int(mode as i32))
            }
            "ctime" => Some(AttrValue::Time(file.header().created)),
            "ino" => Some(AttrValue::Long(file.id() as i64)),
            "dev" => Some(AttrValue::Long(1)),
            "rdev" => Some(AttrValue::Long(0)),
            "nlink" => Some(AttrValue::Int(file.header().nlinks as i32)),
            _ => None,
        }
    }

    fn set(&self, _file: &File, attr: &str, _value: AttrValue, _on_create: bool) -> Result<()> {
        Err(FsError::Unsupported(format!("unix:{attr} is not settable")))
    }
}
