// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The storage pool: bump allocation with best-available recycling.
//!
//! [`StoragePool`] ties the pieces together: the
//! [`BumpRegion`](crate::region::BumpRegion) hands out fresh blocks until
//! the tail runs dry, then the [`MemoryMap`](crate::map::MemoryMap)
//! recycles freed ones — consulting the [`CacheSlot`](crate::cache::CacheSlot)
//! before paying for the ordered scan. Deallocation never returns memory
//! to the host: blocks are marked free, merged forward with free
//! neighbours, and reused.
//!
//! # Placement policy
//! Every request tries the paths in a fixed order:
//! 1. **Bump** — carve from the untouched tail. Biases placement toward
//!    low offsets and keeps the map small early on.
//! 2. **Cache** — if the remembered free block admits the request, claim
//!    it without scanning.
//! 3. **Map scan** — first-fit over free blocks in ascending offset
//!    order.
//!
//! # Thread Safety
//! `StoragePool` is deliberately single-threaded: all methods take
//! `&mut self` and the borrow checker serializes callers. Wrap it in a
//! lock if you must share it.

use crate::cache::CacheSlot;
use crate::map::{BlockMeta, MemoryMap};
use crate::region::BumpRegion;
use crate::stats::StatsSnapshot;
use crate::{PoolCapacity, PoolError, PoolStats};
use std::fmt;
use tracing::{debug, trace, warn};

/// Opaque handle to an allocated block.
///
/// Wraps the block's start offset into the pool. The pool only
/// dereferences offsets through its own map, never as raw pointers, so a
/// stale handle is at worst an [`PoolError::UnknownAddress`] — never
/// undefined behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockAddr(usize);

impl BlockAddr {
    /// The block's start offset into the pool.
    pub fn offset(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// A pooled bump-plus-reclaim allocator over one fixed-size byte region.
///
/// # Example
/// ```
/// use storage_manager::{PoolCapacity, StoragePool};
///
/// let mut pool = StoragePool::new(PoolCapacity::from_bytes(1000));
///
/// let a = pool.allocate(100).unwrap();
/// let b = pool.allocate(200).unwrap();
/// assert_eq!(b.offset(), a.offset() + 100);
///
/// // Freed blocks stay in the map, ready for recycling.
/// pool.deallocate(a).unwrap();
/// assert_eq!(pool.free_in_map(), 100);
/// ```
#[derive(Debug)]
pub struct StoragePool {
    region: BumpRegion,
    map: MemoryMap,
    cache: CacheSlot,
    stats: PoolStats,
}

impl StoragePool {
    /// Creates a pool backed by a zero-filled region of the given
    /// capacity.
    pub fn new(capacity: PoolCapacity) -> Self {
        Self::with_capacity_bytes(capacity.as_bytes())
    }

    /// Creates a pool from a raw byte capacity.
    pub fn with_capacity_bytes(bytes: usize) -> Self {
        debug!(capacity = bytes, "storage pool initialized");
        Self {
            region: BumpRegion::new(bytes),
            map: MemoryMap::new(),
            cache: CacheSlot::new(),
            stats: PoolStats::default(),
        }
    }

    /// Allocates `n` bytes, returning the block's handle.
    ///
    /// The bump path is always tried first; once the tail cannot fit the
    /// request, recycling takes over (cache slot, then first-fit map
    /// scan). A failed allocation changes no state.
    ///
    /// # Errors
    /// [`PoolError::ZeroSizedRequest`] for `n == 0`,
    /// [`PoolError::OutOfCapacity`] when no path finds room.
    pub fn allocate(&mut self, n: usize) -> Result<BlockAddr, PoolError> {
        if n == 0 {
            return Err(PoolError::ZeroSizedRequest);
        }

        if let Some(offset) = self.region.carve(n) {
            self.map.insert_occupied(offset, n);
            self.stats.record_bump_alloc();
            trace!(offset, size = n, "allocated from bump region");
            return Ok(BlockAddr(offset));
        }

        match self.recycle(n) {
            Some(offset) => Ok(BlockAddr(offset)),
            None => Err(PoolError::OutOfCapacity {
                requested: n,
                bump_tail: self.region.remaining(),
                reusable: self.map.free_bytes(),
            }),
        }
    }

    /// Recycle path: cache slot first, then the ordered map scan.
    fn recycle(&mut self, n: usize) -> Option<usize> {
        let live_end = self.region.cursor();

        if self.cache.covers(n) {
            if let Some(offset) = self.map.fetch_if_available(self.cache.addr(), n, live_end) {
                self.stats.record_cache_alloc();
                // The slot is spent; repoint it at the first free block
                // in address order, if any remain.
                match self.map.first_free() {
                    Some((addr, size)) => self.cache.set(addr, size),
                    None => self.cache.clear(),
                }
                debug!(offset, size = n, "recycled via cache slot");
                return Some(offset);
            }
            trace!(addr = self.cache.addr(), "cache slot stale, scanning map");
        }

        let candidate = self.map.first_fit(n)?;
        let offset = self.map.fetch_if_available(candidate, n, live_end)?;
        self.stats.record_map_alloc();
        debug!(offset, size = n, "recycled via map scan");
        Some(offset)
    }

    /// Releases the block at `addr` back to the pool.
    ///
    /// The block is marked free and merged forward with any directly
    /// following free blocks; the cache slot is updated if the merged
    /// block is the largest known. Memory is never returned to the host.
    ///
    /// Releasing an already-free block is idempotent: `Ok(())`, no
    /// re-coalescing, no counter movement.
    ///
    /// # Errors
    /// [`PoolError::UnknownAddress`] if no block starts at `addr`; the
    /// pool is left untouched.
    pub fn deallocate(&mut self, addr: BlockAddr) -> Result<(), PoolError> {
        let offset = addr.offset();
        let meta = match self.map.get(offset) {
            Some(meta) => meta,
            None => {
                warn!(offset, "deallocate: unknown block address");
                return Err(PoolError::UnknownAddress { offset });
            }
        };

        if meta.is_free {
            trace!(offset, "deallocate: block already free");
            return Ok(());
        }

        self.map.set_free(offset);
        let merged = self.map.coalesce_forward(offset, self.region.cursor());
        self.cache.record_if_larger(offset, merged);
        self.stats.record_free();
        trace!(offset, size = merged, "deallocated");
        Ok(())
    }

    /// Immutable view of an occupied block's bytes.
    ///
    /// `None` for free blocks and unknown addresses — freed memory is
    /// the pool's to hand out again.
    pub fn block(&self, addr: BlockAddr) -> Option<&[u8]> {
        match self.map.get(addr.offset()) {
            Some(meta) if !meta.is_free => Some(self.region.slice(addr.offset(), meta.size)),
            _ => None,
        }
    }

    /// Mutable view of an occupied block's bytes.
    pub fn block_mut(&mut self, addr: BlockAddr) -> Option<&mut [u8]> {
        match self.map.get(addr.offset()) {
            Some(meta) if !meta.is_free => {
                Some(self.region.slice_mut(addr.offset(), meta.size))
            }
            _ => None,
        }
    }

    /// Fixed pool capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    /// Bytes consumed by the bump cursor. Monotone; recycling does not
    /// move it.
    pub fn used_bytes(&self) -> usize {
        self.region.used()
    }

    /// Bytes left in the never-touched bump tail.
    pub fn bump_tail_free(&self) -> usize {
        self.region.remaining()
    }

    /// Total bytes held in free map blocks.
    pub fn free_in_map(&self) -> usize {
        self.map.free_bytes()
    }

    /// Number of blocks in the map, free and occupied.
    pub fn block_count(&self) -> usize {
        self.map.len()
    }

    /// All blocks in ascending offset order.
    pub fn blocks(&self) -> impl Iterator<Item = (usize, BlockMeta)> + '_ {
        self.map.iter()
    }

    /// The cache slot contents as `(offset, size)`, if populated.
    pub fn cache_slot(&self) -> Option<(usize, usize)> {
        self.cache.as_pair()
    }

    /// A copy of the raw counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// A point-in-time statistics report with derived figures.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            capacity_bytes: self.capacity(),
            used_bytes: self.used_bytes(),
            free_in_bump_tail: self.bump_tail_free(),
            free_in_map: self.free_in_map(),
            allocs_from_bump: self.stats.allocs_from_bump,
            allocs_from_map: self.stats.allocs_from_map,
            allocs_from_cache: self.stats.allocs_from_cache,
            total_allocs: self.stats.total_allocs(),
            frees: self.stats.frees,
        }
    }

    /// Renders the statistics table as human-readable text.
    pub fn dump_stats(&self) -> String {
        self.snapshot().render_table()
    }

    /// Renders the memory map, one line per block in ascending offset
    /// order.
    pub fn dump_map(&self) -> String {
        let mut out = String::new();
        for (offset, meta) in self.map.iter() {
            out.push_str(&format!(
                "0x{:08x}  {:>10} bytes  <{}>\n",
                offset,
                meta.size,
                if meta.is_free { "Free" } else { "Occupied" }
            ));
        }
        out
    }
}
