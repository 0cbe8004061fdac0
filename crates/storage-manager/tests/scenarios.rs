// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end allocator scenarios and structural invariants.
//!
//! The first half walks concrete allocate/free timelines against a
//! 1000-byte pool and checks exact placements, splits, merges, and
//! counter attribution. The second half hammers a pool with a seeded
//! random interleaving and re-checks the structural invariants after
//! every single operation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use storage_manager::{BlockAddr, BlockMeta, PoolError, StoragePool};

/// Checks the structural invariants every reachable pool state must
/// satisfy:
///
/// - blocks are disjoint and tile the used prefix exactly (their sizes
///   sum to the bump cursor);
/// - every block lies inside `[0, used]` and `used <= capacity`;
/// - a populated cache slot either names a free block of exactly the
///   cached size, or an offset that a forward merge has since removed
///   (the next probe through the slot detects that).
fn assert_invariants(pool: &StoragePool) {
    let blocks: Vec<(usize, BlockMeta)> = pool.blocks().collect();

    let mut prev_end = 0;
    let mut sum = 0;
    for &(offset, meta) in &blocks {
        assert!(meta.size > 0, "zero-sized block at {offset}");
        assert!(
            offset >= prev_end,
            "block at {offset} overlaps previous end {prev_end}"
        );
        assert!(
            offset + meta.size <= pool.used_bytes(),
            "block at {offset} reaches past the bump cursor"
        );
        prev_end = offset + meta.size;
        sum += meta.size;
    }
    assert_eq!(sum, pool.used_bytes(), "blocks do not tile the used prefix");
    assert!(pool.used_bytes() <= pool.capacity());
    assert_eq!(
        pool.free_in_map(),
        blocks
            .iter()
            .filter(|(_, m)| m.is_free)
            .map(|(_, m)| m.size)
            .sum::<usize>()
    );

    if let Some((addr, size)) = pool.cache_slot() {
        assert!(size > 0);
        if let Some(&(_, meta)) = blocks.iter().find(|&&(off, _)| off == addr) {
            assert!(meta.is_free, "cache slot points at an occupied block");
            assert_eq!(meta.size, size, "cache slot size out of date");
        }
    }
}

/// No free block may start where the block at `offset` ends (the
/// forward-coalescing postcondition).
fn assert_no_forward_free(pool: &StoragePool, offset: usize) {
    let end = pool
        .blocks()
        .find(|&(off, _)| off == offset)
        .map(|(off, m)| off + m.size)
        .expect("block not found");
    if let Some((_, next)) = pool.blocks().find(|&(off, _)| off == end) {
        assert!(!next.is_free, "free neighbour at {end} was not merged");
    }
}

fn free_blocks(pool: &StoragePool) -> Vec<(usize, usize)> {
    pool.blocks()
        .filter(|(_, m)| m.is_free)
        .map(|(off, m)| (off, m.size))
        .collect()
}

// ── Concrete timelines (capacity 1000) ─────────────────────────

#[test]
fn bump_only_sequence() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let a1 = pool.allocate(100).unwrap();
    let a2 = pool.allocate(200).unwrap();
    let a3 = pool.allocate(50).unwrap();

    assert_eq!(a2.offset(), a1.offset() + 100);
    assert_eq!(a3.offset(), a1.offset() + 300);
    assert_eq!(pool.used_bytes(), 350);
    assert_eq!(pool.stats().allocs_from_bump, 3);
    assert_eq!(pool.block_count(), 3);
    assert!(pool.blocks().all(|(_, m)| !m.is_free));
    assert_invariants(&pool);
}

#[test]
fn recycle_exact_fit_after_exhaustion() {
    // Recycling is only reachable once the bump tail cannot satisfy the
    // request, so exhaust it first.
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let addrs: Vec<_> = (0..5).map(|_| pool.allocate(200).unwrap()).collect();
    assert_eq!(pool.bump_tail_free(), 0);

    pool.deallocate(addrs[1]).unwrap();
    let again = pool.allocate(200).unwrap();

    assert_eq!(again, addrs[1]);
    assert_eq!(pool.used_bytes(), 1000);
    assert_eq!(pool.block_count(), 5);
    assert!(pool.blocks().all(|(_, m)| !m.is_free));
    // The freed block was sitting in the cache slot, and the cache path
    // is consulted before the map scan.
    assert_eq!(pool.stats().allocs_from_cache, 1);
    assert_eq!(pool.stats().allocs_from_map, 0);
    assert_invariants(&pool);
}

#[test]
fn recycle_smaller_request_splits_block() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let addrs: Vec<_> = (0..5).map(|_| pool.allocate(200).unwrap()).collect();

    pool.deallocate(addrs[1]).unwrap();
    let small = pool.allocate(50).unwrap();

    assert_eq!(small, addrs[1]);
    assert_eq!(pool.used_bytes(), 1000);
    assert_eq!(
        free_blocks(&pool),
        vec![(addrs[1].offset() + 50, 150)],
        "expected one 150-byte fragment after the re-used 50 bytes"
    );
    assert_invariants(&pool);
}

#[test]
fn deallocate_merges_forward() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let a = pool.allocate(100).unwrap();
    let b = pool.allocate(100).unwrap();
    let c = pool.allocate(100).unwrap();

    pool.deallocate(b).unwrap();
    assert_no_forward_free(&pool, b.offset());

    pool.deallocate(a).unwrap();
    assert_no_forward_free(&pool, a.offset());

    // a absorbed b into one 200-byte free block; c is untouched.
    assert_eq!(free_blocks(&pool), vec![(a.offset(), 200)]);
    assert!(pool
        .blocks()
        .any(|(off, m)| off == c.offset() && !m.is_free));
    assert_invariants(&pool);
}

#[test]
fn deallocate_does_not_merge_backward() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let a = pool.allocate(100).unwrap();
    let b = pool.allocate(100).unwrap();
    pool.allocate(100).unwrap();

    // Freeing a before b leaves two adjacent free blocks: merging them
    // would require looking backward from b.
    pool.deallocate(a).unwrap();
    assert_no_forward_free(&pool, a.offset());

    pool.deallocate(b).unwrap();
    assert_no_forward_free(&pool, b.offset());

    assert_eq!(
        free_blocks(&pool),
        vec![(a.offset(), 100), (b.offset(), 100)]
    );
    assert_invariants(&pool);
}

#[test]
fn exhausted_pool_recycles_middle_block() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let addrs: Vec<_> = (0..10).map(|_| pool.allocate(100).unwrap()).collect();
    assert_eq!(pool.bump_tail_free(), 0);

    pool.deallocate(addrs[4]).unwrap();
    let recycled = pool.allocate(100).unwrap();

    assert_eq!(recycled, addrs[4]);
    assert_eq!(pool.used_bytes(), 1000);
    let stats = pool.stats();
    assert_eq!(stats.allocs_from_map + stats.allocs_from_cache, 1);
    assert_invariants(&pool);
}

#[test]
fn map_scan_serves_when_cache_block_is_too_small() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    // Layout: [p0 50][m 100][p1 50][l2 200][p2 50][l1 300][p3 250]
    let _p0 = pool.allocate(50).unwrap();
    let m = pool.allocate(100).unwrap();
    let _p1 = pool.allocate(50).unwrap();
    let l2 = pool.allocate(200).unwrap();
    let _p2 = pool.allocate(50).unwrap();
    let l1 = pool.allocate(300).unwrap();
    let _p3 = pool.allocate(250).unwrap();
    assert_eq!(pool.bump_tail_free(), 0);

    // Free the large block last-to-first in address terms so the cache
    // keeps pointing at the largest (l1).
    pool.deallocate(l1).unwrap();
    pool.deallocate(l2).unwrap();
    pool.deallocate(m).unwrap();
    assert_eq!(pool.cache_slot(), Some((l1.offset(), 300)));

    // Cache hit consumes l1 and refreshes the slot to the first free
    // block in address order — m, which is small.
    let big = pool.allocate(300).unwrap();
    assert_eq!(big, l1);
    assert_eq!(pool.cache_slot(), Some((m.offset(), 100)));

    // Now the slot cannot admit 150 bytes, but l2 can: first-fit scan.
    let mid = pool.allocate(150).unwrap();
    assert_eq!(mid, l2);

    let stats = pool.stats();
    assert_eq!(stats.allocs_from_cache, 1);
    assert_eq!(stats.allocs_from_map, 1);

    // The scan split l2: 50 free bytes remain after the 150.
    assert!(free_blocks(&pool).contains(&(l2.offset() + 150, 50)));
    assert_invariants(&pool);
}

#[test]
fn split_fragment_merges_with_following_free_block() {
    // Build two adjacent free blocks via the backward-merge limitation,
    // then claim part of the first: the split fragment must absorb the
    // second instead of stacking a third adjacent free block.
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let a = pool.allocate(100).unwrap();
    let b = pool.allocate(100).unwrap();
    pool.allocate(800).unwrap();
    assert_eq!(pool.bump_tail_free(), 0);

    pool.deallocate(a).unwrap();
    pool.deallocate(b).unwrap();
    assert_eq!(free_blocks(&pool).len(), 2);

    let claimed = pool.allocate(60).unwrap();
    assert_eq!(claimed, a);
    // Fragment [60, 100) merged with [100, 200) into one 140-byte block.
    assert_eq!(free_blocks(&pool), vec![(60, 140)]);
    assert_invariants(&pool);
}

#[test]
fn merged_away_address_is_unknown() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    let a = pool.allocate(100).unwrap();
    let b = pool.allocate(100).unwrap();

    pool.deallocate(b).unwrap();
    pool.deallocate(a).unwrap();

    // b's entry was absorbed into a; its address no longer names a block.
    assert!(matches!(
        pool.deallocate(b),
        Err(PoolError::UnknownAddress { .. })
    ));
    // a itself is already free: idempotent.
    assert!(pool.deallocate(a).is_ok());
    assert_eq!(pool.stats().frees, 2);
    assert_invariants(&pool);
}

#[test]
fn round_trip_leaves_usage_unchanged() {
    let mut pool = StoragePool::with_capacity_bytes(1000);
    pool.allocate(300).unwrap();
    let used_before = pool.used_bytes();

    let a = pool.allocate(128).unwrap();
    pool.deallocate(a).unwrap();

    assert_eq!(pool.used_bytes(), used_before + 128);
    let frees = free_blocks(&pool);
    assert_eq!(frees, vec![(a.offset(), 128)]);
    assert_invariants(&pool);
}

// ── Randomized soak ────────────────────────────────────────────

#[test]
fn invariants_hold_across_random_interleaving() {
    let mut rng = StdRng::seed_from_u64(0x51077A6E);
    let mut pool = StoragePool::with_capacity_bytes(4096);
    let mut live: Vec<BlockAddr> = Vec::new();

    let mut last_used = 0;
    let mut last_stats = pool.stats();

    for _ in 0..4000 {
        if live.is_empty() || rng.gen_bool(0.6) {
            let n = rng.gen_range(1..=96);
            match pool.allocate(n) {
                Ok(addr) => {
                    // Dirty the block; contents must not disturb metadata.
                    if let Some(bytes) = pool.block_mut(addr) {
                        bytes.fill(0xC3);
                    }
                    live.push(addr);
                }
                Err(PoolError::OutOfCapacity { .. }) => {}
                Err(e) => panic!("unexpected allocation error: {e}"),
            }
        } else {
            let idx = rng.gen_range(0..live.len());
            let addr = live.swap_remove(idx);
            pool.deallocate(addr).unwrap();
            assert_no_forward_free(&pool, addr.offset());
        }

        assert_invariants(&pool);

        // The cursor and every counter are monotone.
        assert!(pool.used_bytes() >= last_used);
        let stats = pool.stats();
        assert!(stats.allocs_from_bump >= last_stats.allocs_from_bump);
        assert!(stats.allocs_from_map >= last_stats.allocs_from_map);
        assert!(stats.allocs_from_cache >= last_stats.allocs_from_cache);
        assert!(stats.frees >= last_stats.frees);
        last_used = pool.used_bytes();
        last_stats = stats;
    }

    // Drain the survivors; afterwards every block in the map is free.
    for addr in live.drain(..) {
        pool.deallocate(addr).unwrap();
        assert_invariants(&pool);
    }
    assert!(pool.blocks().all(|(_, m)| m.is_free));
    assert_eq!(pool.free_in_map(), pool.used_bytes());
    assert_eq!(pool.stats().frees, pool.stats().total_allocs());
}
