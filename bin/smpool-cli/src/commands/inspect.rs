// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `smpool inspect` command: exercise a small pool and show its
//! internals.
//!
//! Issues a short randomized schedule, leaves the surviving blocks in
//! place, then prints the memory map (one line per block, ascending
//! offsets) followed by the statistics table.

use alloc_sim::{driver, RequestSchedule, SimConfig};
use storage_manager::StoragePool;

pub fn execute(capacity: String, ops: usize, max_len: usize, seed: u64) -> anyhow::Result<()> {
    let config = SimConfig {
        capacity,
        repeats: ops,
        max_len,
        // Free roughly half the blocks so the map shows splits, merges,
        // and surviving allocations side by side.
        dealloc_percent: 50,
        seed: Some(seed),
    };
    config.validate()?;

    let mut pool = StoragePool::new(config.parse_capacity()?);
    let schedule = RequestSchedule::generate(&config);
    let report = driver::exercise_pool(&mut pool, &schedule, &config);

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               smpool · Pool Inspector                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  {}", report.summary());
    println!();

    println!("  Memory map ({} blocks):", pool.block_count());
    let dump = pool.dump_map();
    if dump.is_empty() {
        println!("   <empty>");
    } else {
        for line in dump.lines() {
            println!("   {line}");
        }
    }
    println!();

    for line in pool.dump_stats().lines() {
        println!("  {line}");
    }
    println!();

    Ok(())
}
