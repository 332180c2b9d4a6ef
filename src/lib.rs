//! An in-memory virtual filesystem for tests and sandboxes.
//!
//! The engine keeps a whole file tree in process-resident memory: paths,
//! directories, block-backed regular files, symbolic links and extensible
//! attribute views, safe under parallel mutation. Nothing touches disk and
//! the instance vanishes on drop.
//!
//! ```no_run
//! use memfs::{Config, Filesystem};
//!
//! let fs = Filesystem::new(Config::unix()).unwrap();
//! fs.write("/work/hello.txt", b"hello world").unwrap();
//! assert_eq!(fs.read("/work/hello.txt").unwrap(), b"hello world");
//! ```

mod attr;
mod blocks;
mod config;
mod error;
mod file;
mod fs;
mod io;
mod lookup;
mod name;
mod ops;
mod path;
mod state;
mod time;

pub use filetime::FileTime;

pub use attr::{
    AttrValue, AttributeProvider, BasicAttributes, GroupPrincipal, PosixAttributes,
    PosixPermission, UserPrincipal,
};
pub use config::{Config, Feature, DEFAULT_BLOCK_SIZE, DEFAULT_MAX_SIZE, DEFAULT_MAX_SYMLINK_DEPTH};
pub use error::{FsError, Result};
pub use file::{File, FileId};
pub use fs::Filesystem;
pub use io::{ByteChannel, Reader, Writer};
pub use name::{Name, Normalization};
pub use ops::{CopyOptions, DirEntryInfo, MoveOptions, OpenOptions};
pub use path::{MemPath, PathSyntax};
pub use time::{Clock, FixedClock, SystemClock};
