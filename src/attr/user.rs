//! The `user` attribute view: arbitrary byte-array attributes.

use crate::error::{FsError, Result};
use crate::file::File;

use super::{AttrValue, AttributeProvider};

const PREFIX: &str = "user:";

/// Provider for user-defined attributes. Any name is accepted; values are
/// byte arrays.
pub struct UserProvider;

impl AttributeProvider for UserProvider {
    fn name(&self) -> &str {
        "user"
    }

    fn list(&self, file: &File) -> Vec<String> {
        let header = file.header();
        let mut names: Vec<String> = header
            .attrs
            .keys()
            .filter_map(|key| key.strip_prefix(PREFIX).map(str::to_owned))
            .collect();
        names.sort();
        names
    }

    fn supports(&self, attr: &str) -> bool {
        !attr.is_empty()
    }

    fn get(&self, file: &File, attr: &str) -> Option<AttrValue> {
        file.header().attrs.get(&format!("{PREFIX}{attr}")).cloned()
    }

    fn set(&self, file: &File, attr: &str, value: AttrValue, _on_create: bool) -> Result<()> {
        let bytes = match value {
            AttrValue::Bytes(bytes) => bytes,
            AttrValue::String(s) => s.into_bytes(),
            other => {
                return Err(FsError::InvalidArgument(format!(
                    "user:{attr} expects bytes, got {}",
                    other.type_name()
                )))
            }
        };
        file.header().attrs.insert(format!("{PREFIX}{attr}"), AttrValue::Bytes(bytes));
        Ok(())
    }
}
