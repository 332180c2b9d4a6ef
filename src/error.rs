//! Error kinds surfaced by filesystem verbs.

use std::io;

use thiserror::Error;

/// Result of filesystem operations.
pub type Result<T> = std::result::Result<T, FsError>;

/// Filesystem errors.
///
/// Every top-level verb reports failures through this type; messages carry
/// the offending path or attribute text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// A path component was absent during resolution.
    #[error("no such file or directory: '{0}'")]
    NotFound(String),
    /// A create verb hit an existing entry without a replace option.
    #[error("file exists: '{0}'")]
    AlreadyExists(String),
    /// A directory operation named a non-directory.
    #[error("not a directory: '{0}'")]
    NotADirectory(String),
    /// A non-directory operation named a directory.
    #[error("is a directory: '{0}'")]
    IsADirectory(String),
    /// Delete or move refused on a non-empty directory.
    #[error("directory not empty: '{0}'")]
    DirectoryNotEmpty(String),
    /// A symbolic-link chain exceeded the traversal limit.
    #[error("too many levels of symbolic links: '{0}'")]
    SymlinkLoop(String),
    /// The operation targets an attribute or feature that is not enabled.
    #[error("operation not supported: {0}")]
    Unsupported(String),
    /// An attribute spec string failed to parse.
    #[error("invalid attribute spec: '{0}'")]
    InvalidFormat(String),
    /// An attribute name is unknown to the named view.
    #[error("unknown attribute: '{0}'")]
    InvalidAttribute(String),
    /// Wrong value type for an attribute, or bad path syntax.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Block allocation would exceed the configured maximum size.
    #[error("no space left on filesystem")]
    OutOfSpace,
    /// The filesystem or handle has already been closed.
    #[error("filesystem is closed")]
    Closed,
    /// A blocking operation was interrupted.
    #[error("interrupted during blocking I/O")]
    Interrupted,
    /// An atomic move was requested but cannot be satisfied.
    #[error("atomic move not satisfiable: '{0}' -> '{1}'")]
    AtomicViolation(String, String),
    /// Permission-style denial.
    #[error("access denied: '{0}'")]
    AccessDenied(String),
    /// Hard link or move across filesystem instances.
    #[error("cross-device link: '{0}'")]
    CrossDevice(String),
}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> io::Error {
        let kind = match &err {
            FsError::NotFound(_) => io::ErrorKind::NotFound,
            FsError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            FsError::AccessDenied(_) => io::ErrorKind::PermissionDenied,
            FsError::Interrupted => io::ErrorKind::Interrupted,
            FsError::InvalidArgument(_) | FsError::InvalidFormat(_) | FsError::InvalidAttribute(_) => {
                io::ErrorKind::InvalidInput
            }
            FsError::OutOfSpace => io::ErrorKind::OutOfMemory,
            FsError::Unsupported(_) => io::ErrorKind::Unsupported,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
