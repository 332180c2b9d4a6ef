//! The public filesystem façade.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::path::MemPath;
use crate::state::FsState;
use crate::time::{Clock, SystemClock};

/// One in-memory filesystem instance.
///
/// All verbs take path strings parsed under the instance's configured
/// syntax; relative paths resolve against the configured working
/// directory. Dropping the filesystem closes it: outstanding handles keep
/// the state alive but fail with *closed* on their next operation.
pub struct Filesystem {
    pub(crate) state: Arc<FsState>,
}

impl Filesystem {
    /// Create a filesystem from a configuration, allocating its roots and
    /// working directory.
    pub fn new(config: Config) -> Result<Filesystem> {
        Filesystem::with_clock(config, Arc::new(SystemClock))
    }

    /// As [`Filesystem::new`] with an injected time source.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Filesystem> {
        Ok(Filesystem { state: FsState::new(config, clock)? })
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Parse a path string under this instance's syntax.
    pub fn path(&self, raw: &str) -> Result<MemPath> {
        self.state.ctx.parse(raw)
    }

    /// The configured working directory as an absolute path.
    pub fn working_directory(&self) -> Result<MemPath> {
        self.state.ctx.parse(&self.state.config.working_directory)
    }

    /// Bytes currently allocated to regular files.
    pub fn allocated_bytes(&self) -> u64 {
        self.state.pool.allocated_bytes()
    }

    /// Release every block and render outstanding handles closed.
    /// Idempotent.
    pub fn close(&self) {
        self.state.close();
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

impl Drop for Filesystem {
    fn drop(&mut self) {
        self.state.close();
    }
}
