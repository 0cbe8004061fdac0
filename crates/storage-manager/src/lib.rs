// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # storage-manager
//!
//! A pooled bump-plus-reclaim byte allocator over a single, fixed-size
//! contiguous region. Blocks are carved sequentially from a bump cursor;
//! freed blocks stay in an address-ordered memory map and are recycled
//! with first-fit placement, splitting oversized blocks and merging
//! adjacent free ones. A single-slot cache short-circuits the scan for
//! the common case.
//!
//! # Key Components
//!
//! - [`PoolCapacity`] — the fixed region size, with human-readable
//!   parsing (`"512K"`, `"10M"`, `"1G"`).
//! - [`StoragePool`] — the allocator: bump path, cache slot, ordered map
//!   scan, forward coalescing, statistics.
//! - [`BlockAddr`] — opaque handle to an allocated block (an offset,
//!   never a raw pointer).
//! - [`PoolStats`] / [`StatsSnapshot`] — monotone counters attributed by
//!   placement path, plus derived usage figures.
//!
//! # Placement
//!
//! ```text
//! allocate(n)
//!     │
//!     ├─► bump tail has n bytes? ──► carve at cursor          (bump)
//!     ├─► cache slot admits n?   ──► claim via map, refresh   (cache)
//!     ├─► first-fit map scan     ──► claim, maybe split       (map)
//!     └─► OutOfCapacity
//! ```
//!
//! Deallocation marks the block free, merges it forward with any free
//! blocks that directly follow, and remembers the largest free block in
//! the cache slot. Nothing is returned to the host allocator before the
//! pool itself is dropped.
//!
//! # Example
//! ```
//! use storage_manager::{PoolCapacity, StoragePool};
//!
//! let mut pool = StoragePool::new(PoolCapacity::from_kb(1));
//!
//! let a = pool.allocate(100).unwrap();
//! let b = pool.allocate(200).unwrap();
//! assert_eq!(b.offset(), a.offset() + 100);
//!
//! pool.block_mut(a).unwrap().fill(b'x');
//!
//! pool.deallocate(a).unwrap();
//! assert_eq!(pool.free_in_map(), 100);
//! assert_eq!(pool.stats().frees, 1);
//! ```

mod cache;
mod capacity;
mod error;
mod map;
mod pool;
mod region;
mod stats;

pub use capacity::PoolCapacity;
pub use error::PoolError;
pub use map::BlockMeta;
pub use pool::{BlockAddr, StoragePool};
pub use stats::{PoolStats, StatsSnapshot};
