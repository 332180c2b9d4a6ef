//! The `owner` attribute view.

use std::collections::HashMap;

use crate::error::{FsError, Result};
use crate::file::File;

use super::{AttrValue, AttributeProvider, UserPrincipal};

/// Provider for the single `owner` attribute.
pub struct OwnerProvider {
    default_owner: UserPrincipal,
}

impl OwnerProvider {
    pub fn new(defaults: &HashMap<String, AttrValue>) -> Self {
        let default_owner = match defaults.get("owner:owner") {
            Some(AttrValue::User(user)) => user.clone(),
            Some(AttrValue::String(name)) => UserPrincipal(name.clone()),
            _ => UserPrincipal("user".to_owned()),
        };
        Self { default_owner }
    }
}

impl AttributeProvider for OwnerProvider {
    fn name(&self) -> &str {
        "owner"
    }

    fn list(&self, _file: &File) -> Vec<String> {
        vec!["owner".to_owned()]
    }

    fn supports(&self, attr: &str) -> bool {
        attr == "owner"
    }

    fn settable_on_create(&self, attr: &str) -> bool {
        attr == "owner"
    }

    fn get(&self, file: &File, attr: &str) -> Option<AttrValue> {
        if attr != "owner" {
            return None;
        }
        Some(file.header().attrs.get("owner:owner").cloned().unwrap_or_else(|| {
            AttrValue::User(self.default_owner.clone())
        }))
    }

    fn set(&self, file: &File, attr: &str, value: AttrValue, _on_create: bool) -> Result<()> {
        let user = match value {
            AttrValue::User(user) => user,
            AttrValue::String(name) => UserPrincipal(name),
            other => {
                return Err(FsError::InvalidArgument(format!(
                    "owner:{attr} expects a user principal, got {}",
                    other.type_name()
                )))
            }
        };
        file.header().attrs.insert("owner:owner".to_owned(), AttrValue::User(user));
        Ok(())
    }

    fn initial(&self, file: &File) {
        file.header()
            .attrs
            .insert("owner:owner".to_owned(), AttrValue::User(self.default_owner.clone()));
    }
}
