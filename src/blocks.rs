//! Pooled fixed-size byte blocks backing regular files.

use parking_lot::Mutex;

use crate::error::{FsError, Result};

/// A fixed-size byte region, owned either by the pool free list or by one
/// regular file.
#[derive(Debug)]
pub struct Block(Box<[u8]>);

impl Block {
    fn new_zeroed(size: usize) -> Self {
        Block(vec![0u8; size].into_boxed_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Zero `len` bytes starting at `offset`.
    pub fn zero(&mut self, offset: usize, len: usize) {
        self.0[offset..offset + len].fill(0);
    }
}

#[derive(Debug)]
struct PoolState {
    free: Vec<Block>,
    // Blocks currently owned by regular files.
    allocated: u64,
}

/// Arena of fixed-size blocks with a bounded free list.
///
/// Freed blocks are zeroed and retained for reuse up to the cache cap;
/// excess blocks are dropped. Block contents are guarded by the owning
/// file's lock, not by the pool.
#[derive(Debug)]
pub struct BlockPool {
    block_size: usize,
    max_blocks: u64,
    cache_blocks: usize,
    state: Mutex<PoolState>,
}

impl BlockPool {
    pub fn new(block_size: usize, max_size: u64, max_cache_size: u64) -> Self {
        assert!(block_size > 0, "block size must be positive");
        Self {
            block_size,
            max_blocks: max_size / block_size as u64,
            cache_blocks: (max_cache_size / block_size as u64) as usize,
            state: Mutex::new(PoolState { free: Vec::new(), allocated: 0 }),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Move `count` blocks into `out`, reusing cached blocks first.
    pub fn allocate(&self, count: usize, out: &mut Vec<Block>) -> Result<()> {
        let mut state = self.state.lock();
        if state.allocated + count as u64 > self.max_blocks {
            return Err(FsError::OutOfSpace);
        }
        state.allocated += count as u64;
        out.reserve(count);
        for _ in 0..count {
            let block = state.free.pop().unwrap_or_else(|| Block::new_zeroed(self.block_size));
            out.push(block);
        }
        Ok(())
    }

    /// Return blocks to the pool, zeroed; blocks beyond the cache cap are
    /// discarded.
    pub fn free(&self, blocks: impl IntoIterator<Item = Block>) {
        let mut state = self.state.lock();
        for mut block in blocks {
            state.allocated = state.allocated.saturating_sub(1);
            if state.free.len() < self.cache_blocks {
                block.zero(0, self.block_size);
                state.free.push(block);
            }
        }
    }

    /// Bytes currently owned by regular files.
    pub fn allocated_bytes(&self) -> u64 {
        self.state.lock().allocated * self.block_size as u64
    }

    /// Blocks currently held on the free list.
    pub fn cached_blocks(&self) -> usize {
        self.state.lock().free.len()
    }
}
