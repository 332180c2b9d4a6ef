//! The `posix` attribute view.

use std::collections::HashMap;

use crate::error::{FsError, Result};
use crate::file::File;

use super::{AttrValue, AttributeProvider, GroupPrincipal, PosixPermission};

/// Provider for `permissions` and `group`, inheriting basic and owner.
pub struct PosixProvider {
    default_group: GroupPrincipal,
    default_permissions: AttrValue,
}

impl PosixProvider {
    pub fn new(defaults: &HashMap<String, AttrValue>) -> Self {
        let default_group = match defaults.get("posix:group") {
            Some(AttrValue::Group(group)) => group.clone(),
            Some(AttrValue::String(name)) => GroupPrincipal(name.clone()),
            _ => GroupPrincipal("group".to_owned()),
        };
        let default_permissions = match defaults.get("posix:permissions") {
            Some(AttrValue::Permissions(perms)) => AttrValue::Permissions(perms.clone()),
            Some(AttrValue::String(s)) => AttrValue::Permissions(
                PosixPermission::from_string(s).unwrap_or_else(|_| PosixPermission::from_mode(0o644)),
            ),
            _ => AttrValue::Permissions(PosixPermission::from_mode(0o644)),
        };
        Self { default_group, default_permissions }
    }
}

impl AttributeProvider for PosixProvider {
    fn name(&self) -> &str {
        "posix"
    }

    fn inherits(&self) -> &[&str] {
        &["basic", "owner"]
    }

    fn list(&self, _file: &File) -> Vec<String> {
        vec!["permissions".to_owned(), "group".to_owned()]
    }

    fn supports(&self, attr: &str) -> bool {
        attr == "permissions" || attr == "group"
    }

    fn settable_on_create(&self, attr: &str) -> bool {
        attr == "permissions" || attr == "group"
    }

    fn get(&self, file: &File, attr: &str) -> Option<AttrValue> {
        match attr {
            "permissions" => Some(
                file.header()
                    .attrs
                    .get("posix:permissions")
                    .cloned()
                    .unwrap_or_else(|| self.default_permissions.clone()),
            ),
            "group" => Some(file.header().attrs.get("posix:group").cloned().unwrap_or_else(
                || AttrValue::Group(self.default_group.clone()),
            )),
            _ => None,
        }
    }

    fn set(&self, file: &File, attr: &str, value: AttrValue, _on_create: bool) -> Result<()> {
        match attr {
            "permissions" => {
                let perms = match value {
                    AttrValue::Permissions(perms) => perms,
                    AttrValue::String(s) => PosixPermission::from_string(&s)?,
                    other => {
                        return Err(FsError::InvalidArgument(format!(
                            "posix:permissions expects a permission set, got {}",
                            other.type_name()
                        )))
                    }
                };
                file.header()
                    .attrs
                    .insert("posix:permissions".to_owned(), AttrValue::Permissions(perms));
                Ok(())
            }
            "group" => {
                let group = match value {
                    AttrValue::Group(group) => group,
                    AttrValue::String(name) => GroupPrincipal(name),
                    other => {
                        return Err(FsError::InvalidArgument(format!(
                            "posix:group expects a group principal, got {}",
                            other.type_name()
                        )))
                    }
                };
                file.header().attrs.insert("posix:group".to_owned(), AttrValue::Group(group));
                Ok(())
            }
            _ => Err(FsError::InvalidAttribute(format!("posix:{attr}"))),
        }
    }

    fn initial(&self, file: &File) {
        let mut header = file.header();
        header
            .attrs
            .insert("posix:permissions".to_owned(), self.default_permissions.clone());
        header
            .attrs
            .insert("posix:group".to_owned(), AttrValue::Group(self.default_group.clone()));
    }
}
