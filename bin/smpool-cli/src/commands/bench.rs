// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `smpool bench` command: comparative benchmark against the host
//! allocator.
//!
//! Runs the identical randomized schedule through both allocators and
//! prints the per-run statistics, the pool's placement breakdown, and
//! the relative timing.

use alloc_sim::{driver, SimConfig};
use std::path::PathBuf;

pub fn execute(
    config_path: Option<PathBuf>,
    capacity: String,
    repeats: usize,
    max_len: usize,
    dealloc_percent: u8,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => SimConfig::from_file(&path)?,
        None => SimConfig {
            capacity,
            repeats,
            max_len,
            dealloc_percent,
            seed,
        },
    };
    config.validate()?;

    if !json {
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║            smpool · Comparative Benchmark            ║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        println!("  Capacity:        {}", config.capacity);
        println!("  Requests:        {}", config.repeats);
        println!("  Max length:      {} bytes", config.max_len);
        println!("  Dealloc chance:  {}%", config.dealloc_percent);
        println!();
    }

    let comparison = driver::run_comparison(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!("  {}", comparison.baseline.summary());
    println!("  {}", comparison.pool.summary());
    println!();

    for line in comparison.pool_stats.render_table().lines() {
        println!("  {line}");
    }
    println!();

    println!("  {}", comparison.summary());
    println!();

    Ok(())
}
