// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The address-ordered memory map.
//!
//! [`MemoryMap`] associates every block's start offset with its metadata
//! and drives the recycling machinery: first-fit lookup, in-place claim
//! with split, and forward coalescing of adjacent free blocks.
//!
//! # Invariants
//! - Keys are distinct block start offsets; intervals never overlap.
//! - Every interval lies inside `[0, live_end)`, where `live_end` is the
//!   pool's bump cursor — together the entries tile the used prefix
//!   exactly.
//! - Coalescing only looks *forward*: a free block immediately preceding
//!   a newly freed one is left alone until its own turn comes.
//!
//! The map is a `BTreeMap` keyed by offset. Both first-fit ("lowest
//! address wins") and forward coalescing depend on address order, so an
//! ordered container is load-bearing here, not a style choice.

use std::collections::BTreeMap;
use tracing::trace;

/// Metadata for one block: its length and whether it is reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMeta {
    /// Block length in bytes. Positive; shrinks only when a claim splits
    /// the block.
    pub size: usize,
    /// Whether the block is available for recycling.
    pub is_free: bool,
}

/// Ordered association from block start offset to [`BlockMeta`].
#[derive(Debug, Default)]
pub(crate) struct MemoryMap {
    blocks: BTreeMap<usize, BlockMeta>,
}

impl MemoryMap {
    pub(crate) fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Records a freshly bump-allocated block.
    pub(crate) fn insert_occupied(&mut self, offset: usize, size: usize) {
        self.blocks.insert(
            offset,
            BlockMeta {
                size,
                is_free: false,
            },
        );
    }

    /// Metadata for the block starting at `offset`, if one does.
    pub(crate) fn get(&self, offset: usize) -> Option<BlockMeta> {
        self.blocks.get(&offset).copied()
    }

    /// Marks the block at `offset` free. Returns `false` if no block
    /// starts there.
    pub(crate) fn set_free(&mut self, offset: usize) -> bool {
        match self.blocks.get_mut(&offset) {
            Some(meta) => {
                meta.is_free = true;
                true
            }
            None => false,
        }
    }

    /// Number of recorded blocks, free and occupied.
    pub(crate) fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Iterates all blocks in ascending offset order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, BlockMeta)> + '_ {
        self.blocks.iter().map(|(&offset, &meta)| (offset, meta))
    }

    /// Total bytes held in free blocks.
    pub(crate) fn free_bytes(&self) -> usize {
        self.blocks
            .values()
            .filter(|m| m.is_free)
            .map(|m| m.size)
            .sum()
    }

    /// The first free block in address order, as `(offset, size)`.
    pub(crate) fn first_free(&self) -> Option<(usize, usize)> {
        self.blocks
            .iter()
            .find(|(_, m)| m.is_free)
            .map(|(&offset, m)| (offset, m.size))
    }

    /// First-fit scan: the lowest-addressed free block of at least `n`
    /// bytes.
    pub(crate) fn first_fit(&self, n: usize) -> Option<usize> {
        self.blocks
            .iter()
            .find(|(_, m)| m.is_free && m.size >= n)
            .map(|(&offset, _)| offset)
    }

    /// Claims the block at `offset` for a request of `n` bytes, if it is
    /// free and large enough. Returns the claimed offset on success.
    ///
    /// On a claim the block is marked occupied and resized to exactly
    /// `n`. If it was larger, the unused tail becomes a new free block —
    /// after first absorbing any free block that starts where the
    /// original block ended (a leftover of earlier splits), so the
    /// fragment enters the map already merged.
    ///
    /// A miss (no such block, occupied, or too small) changes nothing;
    /// callers holding a stale cache hint rely on that.
    pub(crate) fn fetch_if_available(
        &mut self,
        offset: usize,
        n: usize,
        live_end: usize,
    ) -> Option<usize> {
        let orig = match self.blocks.get_mut(&offset) {
            Some(meta) if meta.is_free && meta.size >= n => {
                let orig = meta.size;
                meta.size = n;
                meta.is_free = false;
                orig
            }
            _ => return None,
        };

        if orig > n {
            let fragment = offset + n;
            let fragment_size = self.absorb_following(fragment, orig - n, live_end);
            trace!(offset = fragment, size = fragment_size, "split fragment");
            self.blocks.insert(
                fragment,
                BlockMeta {
                    size: fragment_size,
                    is_free: true,
                },
            );
        }

        Some(offset)
    }

    /// Merges every free block directly following the free block at
    /// `offset` into it. Returns the merged size (unchanged if nothing
    /// was adjacent). No-op returning 0 if no block starts at `offset`.
    pub(crate) fn coalesce_forward(&mut self, offset: usize, live_end: usize) -> usize {
        let size = match self.blocks.get(&offset) {
            Some(meta) => meta.size,
            None => return 0,
        };
        let merged = self.absorb_following(offset, size, live_end);
        if merged != size {
            if let Some(meta) = self.blocks.get_mut(&offset) {
                meta.size = merged;
            }
        }
        merged
    }

    /// Core of forward coalescing: starting from a (possibly detached)
    /// block `[offset, offset + size)`, repeatedly consumes the free
    /// block that starts exactly at its end, growing `size`. Stops at
    /// the first gap, occupied block, or the bump boundary.
    ///
    /// Termination is checked against `live_end` — the bump cursor, not
    /// the pool capacity — because no block can start in the untouched
    /// tail.
    fn absorb_following(&mut self, offset: usize, size: usize, live_end: usize) -> usize {
        let mut size = size;
        loop {
            let next = offset + size;
            if next >= live_end {
                break;
            }
            match self.blocks.get(&next) {
                Some(meta) if meta.is_free => {
                    trace!(offset, merged = size + meta.size, "forward merge");
                    size += meta.size;
                    self.blocks.remove(&next);
                }
                _ => break,
            }
        }
        size
    }
}
