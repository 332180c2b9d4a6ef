//! The `basic` attribute view.

use crate::error::{FsError, Result};
use crate::file::File;

use super::{AttrValue, AttributeProvider};

const ATTRIBUTES: &[&str] = &[
    "lastModifiedTime",
    "lastAccessTime",
    "creationTime",
    "size",
    "isRegularFile",
    "isDirectory",
    "isSymbolicLink",
    "isOther",
    "fileKey",
];

/// Provider for the nine basic attributes, always enabled.
pub struct BasicProvider;

impl AttributeProvider for BasicProvider {
    fn name(&self) -> &str {
        "basic"
    }

    fn list(&self, _file: &File) -> Vec<String> {
        ATTRIBUTES.iter().map(|&a| a.to_owned()).collect()
    }

    fn supports(&self, attr: &str) -> bool {
        ATTRIBUTES.contains(&attr)
    }

    fn get(&self, file: &File, attr: &str) -> Option<AttrValue> {
        match attr {
            "lastModifiedTime" => Some(AttrValue::Time(file.header().modified)),
            "lastAccessTime" => Some(AttrValue::Time(file.header().accessed)),
            "creationTime" => Some(AttrValue::Time(file.header().created)),
            "size" => Some(AttrValue::Long(file.size() as i64)),
            "isRegularFile" => Some(AttrValue::Bool(file.is_regular())),
            "isDirectory" => Some(AttrValue::Bool(file.is_directory())),
            "isSymbolicLink" => Some(AttrValue::Bool(file.is_symlink())),
            "isOther" => Some(AttrValue::Bool(false)),
            "fileKey" => Some(AttrValue::Long(file.id() as i64)),
            _ => None,
        }
    }

    fn set(&self, file: &File, attr: &str, value: AttrValue, _on_create: bool) -> Result<()> {
        let time = match value {
            AttrValue::Time(time) => time,
            other => {
                return Err(FsError::InvalidArgument(format!(
                    "basic:{attr} expects a time value, got {}",
                    other.type_name()
                )))
            }
        };
        let mut header = file.header();
        match attr {
            "lastModifiedTime" => header.modified = time,
            "lastAccessTime" => header.accessed = time,
            "creationTime" => header.created = time,
            _ => {
                return Err(FsError::Unsupported(format!("basic:{attr} is not settable")));
            }
        }
        Ok(())
    }
}
