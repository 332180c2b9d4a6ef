//! Byte channels and stream adapters over regular files.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use crate::error::{FsError, Result};
use crate::file::File;
use crate::state::FsState;

/// A positioned handle on one regular file.
///
/// The channel caches a direct node reference taken under the tree lock
/// at open time, so byte transfers never touch the tree lock. The handle
/// keeps the node alive across unlink; the last close of an unlinked file
/// returns its blocks to the pool.
pub struct ByteChannel {
    state: Arc<FsState>,
    file: Arc<File>,
    readable: bool,
    writable: bool,
    append_mode: bool,
    pos: u64,
    open: bool,
}

impl ByteChannel {
    pub(crate) fn new(
        state: Arc<FsState>,
        file: Arc<File>,
        readable: bool,
        writable: bool,
        append: bool,
    ) -> ByteChannel {
        ByteChannel { state, file, readable, writable, append_mode: append, pos: 0, open: true }
    }

    fn ensure_readable(&self) -> Result<()> {
        self.ensure_open()?;
        if !self.readable {
            return Err(FsError::AccessDenied("channel is not readable".to_owned()));
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        self.ensure_open()?;
        if !self.writable {
            return Err(FsError::AccessDenied("channel is not writable".to_owned()));
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if !self.open {
            return Err(FsError::Closed);
        }
        self.state.check_open()
    }

    /// The file key of the node behind this channel.
    pub fn file_key(&self) -> u64 {
        self.file.id()
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn set_position(&mut self, pos: u64) {
        self.pos = pos;
    }

    /// Current logical size of the file.
    pub fn size(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.file.size())
    }

    /// Read at an explicit position without moving the channel position.
    /// Returns the bytes copied; zero at or past end of file.
    pub fn read_at(&self, pos: u64, buf: &mut [u8]) -> Result<usize> {
        self.ensure_readable()?;
        let content = self.file.content().expect("channel is on a regular file");
        let n = content.read().read(pos, buf);
        self.file.header().accessed = self.state.now();
        Ok(n)
    }

    /// Write at an explicit position without moving the channel position.
    pub fn write_at(&self, pos: u64, buf: &[u8]) -> Result<usize> {
        self.ensure_writable()?;
        let content = self.file.content().expect("channel is on a regular file");
        let n = content.write().write(pos, buf, &self.state.pool)?;
        self.file.header().modified = self.state.now();
        Ok(n)
    }

    /// Append atomically with respect to the file size, returning the
    /// position the data landed at.
    pub fn append(&self, buf: &[u8]) -> Result<u64> {
        self.ensure_writable()?;
        let content = self.file.content().expect("channel is on a regular file");
        let mut guard = content.write();
        let pos = guard.size();
        guard.write(pos, buf, &self.state.pool)?;
        drop(guard);
        self.file.header().modified = self.state.now();
        Ok(pos)
    }

    /// Shrink the file to `size`; growing is lazy and changes nothing.
    pub fn truncate(&self, size: u64) -> Result<()> {
        self.ensure_writable()?;
        let content = self.file.content().expect("channel is on a regular file");
        content.write().truncate(size, &self.state.pool);
        self.file.header().modified = self.state.now();
        Ok(())
    }

    /// Release this handle. The node is finalized when it has no links
    /// and no other handles. Idempotent.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.state.release_handle(&self.file);
    }
}

impl Read for ByteChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.read_at(self.pos, buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for ByteChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.append_mode {
            let pos = self.append(buf)?;
            self.pos = pos + buf.len() as u64;
            return Ok(buf.len());
        }
        let n = self.write_at(self.pos, buf)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for ByteChannel {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        let target = match from {
            SeekFrom::Start(pos) => pos as i128,
            SeekFrom::Current(delta) => self.pos as i128 + delta as i128,
            SeekFrom::End(delta) => self.size()? as i128 + delta as i128,
        };
        if target < 0 || target > u64::MAX as i128 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek out of range"));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}

impl Drop for ByteChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read-only stream over a regular file.
pub struct Reader {
    channel: ByteChannel,
}

impl Reader {
    pub(crate) fn new(channel: ByteChannel) -> Reader {
        Reader { channel }
    }

    pub fn close(&mut self) {
        self.channel.close();
    }
}

impl Read for Reader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.channel.read(buf)
    }
}

/// Writable stream over a regular file.
pub struct Writer {
    channel: ByteChannel,
}

impl Writer {
    pub(crate) fn new(channel: ByteChannel) -> Writer {
        Writer { channel }
    }

    pub fn close(&mut self) {
        self.channel.close();
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.channel.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.channel.flush()
    }
}
