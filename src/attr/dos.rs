//! The `dos` attribute view.

use crate::error::{FsError, Result};
use crate::file::File;

use super::{AttrValue, AttributeProvider};

const ATTRIBUTES: &[&str] = &["readonly", "hidden", "system", "archive"];

/// Provider for DOS flag attributes, all defaulting to false.
pub struct DosProvider;

impl AttributeProvider for DosProvider {
    fn name(&self) -> &str {
        "dos"
    }

    fn inherits(&self) -> &[&str] {
        &["basic"]
    }

    fn list(&self, _file: &File) -> Vec<String> {
        ATTRIBUTES.iter().map(|&a| a.to_owned()).collect()
    }

    fn supports(&self, attr: &str) -> bool {
        ATTRIBUTES.contains(&attr)
    }

    fn get(&self, file: &File, attr: &str) -> Option<AttrValue> {
        if !self.supports(attr) {
            return None;
        }
        Some(
            file.header()
                .attrs
                .get(&format!("dos:{attr}"))
                .cloned()
                .unwrap_or(AttrValue::Bool(false)),
        )
    }

    fn set(&self, file: &File, attr: &str, value: AttrValue, _on_create: bool) -> Result<()> {
        let flag = match value {
            AttrValue::Bool(flag) => flag,
            other => {
                return Err(FsError::InvalidArgument(format!(
                    "dos:{attr} expects a bool, got {}",
                    other.type_name()
                )))
            }
        };
        file.header().attrs.insert(format!("dos:{attr}"), AttrValue::Bool(flag));
        Ok(())
    }

    fn initial(&self, file: &File) {
        let mut header = file.header();
        for attr in ATTRIBUTES {
            header.attrs.insert(format!("dos:{attr}"), AttrValue::Bool(false));
        }
    }
}
