//! Opening byte channels and stream adapters.

use std::sync::Arc;

use tracing::debug;

use crate::error::{FsError, Result};
use crate::file::File;
use crate::fs::Filesystem;
use crate::io::{ByteChannel, Reader, Writer};
use crate::lookup::{LinkPolicy, Lookup};
use crate::path::MemPath;

/// How to open a regular file, mirroring `std::fs::OpenOptions`.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    pub(crate) read: bool,
    pub(crate) write: bool,
    pub(crate) append: bool,
    pub(crate) truncate: bool,
    pub(crate) create: bool,
    pub(crate) create_new: bool,
}

impl OpenOptions {
    pub fn new() -> OpenOptions {
        OpenOptions::default()
    }

    pub fn read(&mut self, read: bool) -> &mut OpenOptions {
        self.read = read;
        self
    }

    pub fn write(&mut self, write: bool) -> &mut OpenOptions {
        self.write = write;
        self
    }

    /// Write mode where every write lands at the current end of file.
    pub fn append(&mut self, append: bool) -> &mut OpenOptions {
        self.append = append;
        if append {
            self.write = true;
        }
        self
    }

    pub fn truncate(&mut self, truncate: bool) -> &mut OpenOptions {
        self.truncate = truncate;
        self
    }

    pub fn create(&mut self, create: bool) -> &mut OpenOptions {
        self.create = create;
        self
    }

    /// Create the file, failing if it already exists.
    pub fn create_new(&mut self, create_new: bool) -> &mut OpenOptions {
        self.create_new = create_new;
        self
    }
}

impl Filesystem {
    /// Open a byte channel on the regular file at `path`. The channel
    /// holds the node alive: an unlinked file stays readable and writable
    /// until its last handle closes.
    pub fn open(&self, path: &str, options: &OpenOptions) -> Result<ByteChannel> {
        self.state.check_open()?;
        if !options.read && !options.write {
            return Err(FsError::InvalidArgument(
                "open requires read or write access".to_owned(),
            ));
        }
        if (options.create || options.create_new || options.truncate || options.append)
            && !options.write
        {
            return Err(FsError::InvalidArgument(
                "create, truncate and append require write access".to_owned(),
            ));
        }
        let path = self.path(path)?;

        // Plain opens only resolve, so the read side of the tree lock is
        // enough; the write side is taken just for the create path below.
        let existing = {
            let _tree = self.state.tree.read();
            let lookup = self.state.lookup(&path, LinkPolicy::Follow)?;
            self.claim_existing(&lookup, &path, options)?
        };
        let file = match existing {
            Some(file) => file,
            None => {
                if !(options.create || options.create_new) {
                    return Err(FsError::NotFound(path.to_string()));
                }
                let _tree = self.state.tree.write();
                // The entry may have appeared since the read lock was
                // dropped.
                let lookup = self.state.lookup(&path, LinkPolicy::Follow)?;
                match self.claim_existing(&lookup, &path, options)? {
                    Some(file) => file,
                    None => {
                        let (parent, name) = lookup.entry(&path)?;
                        let file = self.state.new_regular_node(&[])?;
                        self.state.link_entry(parent, name.clone(), &file)?;
                        file.header().open_count += 1;
                        debug!(path = %path, id = file.id(), "file created on open");
                        file
                    }
                }
            }
        };
        if options.truncate {
            let content = file.content().expect("regular kind");
            content.write().truncate(0, &self.state.pool);
            file.header().modified = self.state.now();
        }
        Ok(ByteChannel::new(
            self.state.clone(),
            file,
            options.read,
            options.write,
            options.append,
        ))
    }

    /// Check an existing entry against the open options and claim a
    /// handle on it. The open count is bumped while the caller still
    /// holds the tree lock, so an unlink racing in behind the lock can
    /// never finalize the node out from under the new channel.
    fn claim_existing(
        &self,
        lookup: &Lookup,
        path: &MemPath,
        options: &OpenOptions,
    ) -> Result<Option<Arc<File>>> {
        match &lookup.file {
            Some(file) => {
                if options.create_new {
                    return Err(FsError::AlreadyExists(path.to_string()));
                }
                if file.is_directory() {
                    return Err(FsError::IsADirectory(path.to_string()));
                }
                file.header().open_count += 1;
                Ok(Some(file.clone()))
            }
            None => Ok(None),
        }
    }

    /// Read-only stream over the file at `path`.
    pub fn reader(&self, path: &str) -> Result<Reader> {
        Ok(Reader::new(self.open(path, OpenOptions::new().read(true))?))
    }

    /// Writable stream at `path`, created or truncated like
    /// `std::fs::File::create`.
    pub fn writer(&self, path: &str) -> Result<Writer> {
        Ok(Writer::new(self.open(
            path,
            OpenOptions::new().write(true).create(true).truncate(true),
        )?))
    }

    /// Writable stream positioned at end of file, created if missing.
    pub fn appender(&self, path: &str) -> Result<Writer> {
        Ok(Writer::new(self.open(path, OpenOptions::new().append(true).create(true))?))
    }

    /// Full contents of the regular file at `path`.
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.state.check_open()?;
        let parsed = self.path(path)?;
        let _tree = self.state.tree.read();
        let file = self.state.lookup(&parsed, LinkPolicy::Follow)?.require(&parsed)?;
        let content = match file.content() {
            Some(content) => content,
            None if file.is_directory() => {
                return Err(FsError::IsADirectory(parsed.to_string()));
            }
            None => return Err(FsError::InvalidArgument(format!("not readable: '{parsed}'"))),
        };
        let guard = content.read();
        let mut buf = vec![0u8; guard.size() as usize];
        guard.read(0, &mut buf);
        drop(guard);
        file.header().accessed = self.state.now();
        Ok(buf)
    }

    /// Replace the contents of the file at `path`, creating it if needed.
    pub fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let channel =
            self.open(path, OpenOptions::new().write(true).create(true).truncate(true))?;
        channel.write_at(0, data)?;
        Ok(())
    }
}
