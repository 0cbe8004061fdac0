// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The simulation driver.
//!
//! Runs one pre-generated [`RequestSchedule`] against the storage pool
//! and against the host allocator, with identical deallocation
//! decisions on both sides (the schedule's seed re-seeds the driver's
//! RNG for each run). Every allocation is written to, so the comparison
//! includes the cost of actually touching the memory, not just
//! bookkeeping.
//!
//! Each loop iteration allocates `size + 1` bytes (payload plus
//! terminator), fills the payload, then with probability
//! `dealloc_percent/100` frees one uniformly random live block.
//! Whatever survives the loop is released afterwards, outside the
//! timed window.

use crate::{Comparison, RequestSchedule, SimConfig, SimError, SimReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use storage_manager::{BlockAddr, StatsSnapshot, StoragePool};
use tracing::{debug, info};

/// Byte written into every allocated payload.
const FILL_BYTE: u8 = b'A';

/// Runs the full comparison: host-allocator baseline first, then the
/// pool, both over the same schedule.
pub fn run_comparison(config: &SimConfig) -> Result<Comparison, SimError> {
    config.validate()?;
    let schedule = RequestSchedule::generate(config);
    info!(
        seed = schedule.seed(),
        repeats = schedule.len(),
        capacity = %config.capacity,
        "running comparative simulation"
    );

    let baseline = run_system(&schedule, config);
    debug!("{}", baseline.summary());

    let (pool, pool_stats) = run_pool(&schedule, config)?;
    debug!("{}", pool.summary());

    Ok(Comparison {
        baseline,
        pool,
        pool_stats,
        seed: schedule.seed(),
    })
}

/// Runs the schedule against a fresh [`StoragePool`], returning the
/// timed report and the pool's final statistics.
pub fn run_pool(
    schedule: &RequestSchedule,
    config: &SimConfig,
) -> Result<(SimReport, StatsSnapshot), SimError> {
    let mut pool = StoragePool::new(config.parse_capacity()?);
    let report = drive_pool(&mut pool, schedule, config, true);
    Ok((report, pool.snapshot()))
}

/// Runs the schedule against an existing pool and leaves the surviving
/// blocks allocated, so the caller can inspect the resulting map.
pub fn exercise_pool(
    pool: &mut StoragePool,
    schedule: &RequestSchedule,
    config: &SimConfig,
) -> SimReport {
    drive_pool(pool, schedule, config, false)
}

fn drive_pool(
    pool: &mut StoragePool,
    schedule: &RequestSchedule,
    config: &SimConfig,
    cleanup: bool,
) -> SimReport {
    let mut rng = StdRng::seed_from_u64(schedule.seed());
    let mut live: Vec<BlockAddr> = Vec::new();

    let mut allocs_ok = 0u64;
    let mut allocs_failed = 0u64;
    let mut frees = 0u64;
    let mut bytes_requested = 0u64;

    let start = Instant::now();
    for &size in schedule.sizes() {
        let request = size + 1;
        match pool.allocate(request) {
            Ok(addr) => {
                if let Some(bytes) = pool.block_mut(addr) {
                    let (payload, terminator) = bytes.split_at_mut(size);
                    payload.fill(FILL_BYTE);
                    terminator[0] = 0;
                }
                allocs_ok += 1;
                bytes_requested += request as u64;
                live.push(addr);

                if should_dealloc(&mut rng, config) {
                    let idx = rng.gen_range(0..live.len());
                    let victim = live.remove(idx);
                    if pool.deallocate(victim).is_ok() {
                        frees += 1;
                    }
                }
            }
            Err(_) => allocs_failed += 1,
        }
    }
    let elapsed = start.elapsed();

    if cleanup {
        for addr in live.drain(..) {
            let _ = pool.deallocate(addr);
        }
    }

    SimReport {
        label: "storage-pool".into(),
        elapsed,
        allocs_ok,
        allocs_failed,
        frees,
        bytes_requested,
    }
}

/// Runs the schedule against the host allocator (`Vec<u8>` per block)
/// for the baseline measurement.
pub fn run_system(schedule: &RequestSchedule, config: &SimConfig) -> SimReport {
    let mut rng = StdRng::seed_from_u64(schedule.seed());
    let mut live: Vec<Vec<u8>> = Vec::new();

    let mut allocs_ok = 0u64;
    let mut frees = 0u64;
    let mut bytes_requested = 0u64;

    let start = Instant::now();
    for &size in schedule.sizes() {
        let request = size + 1;
        let mut block = vec![0u8; request];
        block[..size].fill(FILL_BYTE);
        allocs_ok += 1;
        bytes_requested += request as u64;
        live.push(block);

        if should_dealloc(&mut rng, config) {
            let idx = rng.gen_range(0..live.len());
            drop(live.remove(idx));
            frees += 1;
        }
    }
    let elapsed = start.elapsed();
    live.clear();

    SimReport {
        label: "host-allocator".into(),
        elapsed,
        allocs_ok,
        allocs_failed: 0,
        frees,
        bytes_requested,
    }
}

fn should_dealloc(rng: &mut StdRng, config: &SimConfig) -> bool {
    config.dealloc_percent > 0 && rng.gen_range(0..100u8) < config.dealloc_percent
}
