//! Block-backed byte store of a regular file.

use std::mem;

use crate::blocks::{Block, BlockPool};
use crate::error::Result;

/// The block array and logical size of one regular file.
///
/// Invariant: `size <= blocks.len() * B`, and every byte in
/// `[size, blocks.len() * B)` is zero. Freshly allocated blocks arrive
/// zeroed from the pool and truncation re-zeroes the tail, so sparse
/// writes never expose stale bytes.
#[derive(Debug)]
pub struct FileContent {
    blocks: Vec<Block>,
    size: u64,
}

impl FileContent {
    pub fn new() -> Self {
        Self { blocks: Vec::new(), size: 0 }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Copy bytes starting at `pos` into `dst`; returns the count copied,
    /// zero at or past end-of-file.
    pub fn read(&self, pos: u64, dst: &mut [u8]) -> usize {
        if pos >= self.size || dst.is_empty() {
            return 0;
        }
        let n = (self.size - pos).min(dst.len() as u64) as usize;
        let block_size = self.blocks[0].len() as u64;
        let mut copied = 0;
        while copied < n {
            let at = pos + copied as u64;
            let block = &self.blocks[(at / block_size) as usize];
            let offset = (at % block_size) as usize;
            let take = (n - copied).min(block.len() - offset);
            dst[copied..copied + take].copy_from_slice(&block.bytes()[offset..offset + take]);
            copied += take;
        }
        n
    }

    /// Copy `src` into the file at `pos`, growing the block array and the
    /// size as needed. A gap between the old size and `pos` reads as
    /// zeros afterwards.
    pub fn write(&mut self, pos: u64, src: &[u8], pool: &BlockPool) -> Result<usize> {
        if src.is_empty() {
            return Ok(0);
        }
        let block_size = pool.block_size() as u64;
        let end = pos + src.len() as u64;
        let needed = end.div_ceil(block_size) as usize;
        if needed > self.blocks.len() {
            pool.allocate(needed - self.blocks.len(), &mut self.blocks)?;
        }
        let mut copied = 0;
        while copied < src.len() {
            let at = pos + copied as u64;
            let block = &mut self.blocks[(at / block_size) as usize];
            let offset = (at % block_size) as usize;
            let take = (src.len() - copied).min(block.len() - offset);
            block.bytes_mut()[offset..offset + take]
                .copy_from_slice(&src[copied..copied + take]);
            copied += take;
        }
        if end > self.size {
            self.size = end;
        }
        Ok(src.len())
    }

    /// Shrink to `new_size`, returning surplus blocks to the pool and
    /// zeroing the tail of the last kept block. Growing is lazy: a larger
    /// `new_size` changes nothing now.
    pub fn truncate(&mut self, new_size: u64, pool: &BlockPool) {
        if new_size >= self.size {
            return;
        }
        let block_size = pool.block_size() as u64;
        let keep = new_size.div_ceil(block_size) as usize;
        if keep < self.blocks.len() {
            let surplus: Vec<Block> = self.blocks.drain(keep..).collect();
            pool.free(surplus);
        }
        let tail = (new_size % block_size) as usize;
        if tail != 0 {
            let last = self.blocks.last_mut().expect("kept block for non-empty size");
            last.zero(tail, last.len() - tail);
        }
        self.size = new_size;
    }

    /// Block-granular copy from `other` into this (empty) content, with no
    /// intermediate buffer.
    pub fn copy_from(&mut self, other: &FileContent, pool: &BlockPool) -> Result<()> {
        debug_assert!(self.blocks.is_empty() && self.size == 0);
        pool.allocate(other.blocks.len(), &mut self.blocks)?;
        for (dst, src) in self.blocks.iter_mut().zip(&other.blocks) {
            dst.bytes_mut().copy_from_slice(src.bytes());
        }
        self.size = other.size;
        Ok(())
    }

    pub(crate) fn take_blocks(&mut self) -> Vec<Block> {
        self.size = 0;
        mem::take(&mut self.blocks)
    }
}

impl Default for FileContent {
    fn default() -> Self {
        Self::new()
    }
}
