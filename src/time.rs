//! File-time sources.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use filetime::FileTime;

/// Source of file timestamps.
///
/// The filesystem stamps creation, modification and access times through
/// this capability so tests can substitute a deterministic source.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> FileTime;
}

/// Wall-clock time source used by default.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> FileTime {
        FileTime::now()
    }
}

/// Deterministic source yielding strictly increasing virtual time.
///
/// Each call advances the clock by one nanosecond.
#[derive(Debug)]
pub struct FixedClock {
    nanos: AtomicU64,
}

impl FixedClock {
    pub fn new(start_nanos: u64) -> Self {
        Self { nanos: AtomicU64::new(start_nanos) }
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> FileTime {
        let total = self.nanos.fetch_add(1, Ordering::Relaxed);
        FileTime::from_unix_time((total / 1_000_000_000) as i64, (total % 1_000_000_000) as u32)
    }
}
