// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: compare the storage pool against the host allocator on a
//! small reproducible workload.
//!
//! ```bash
//! cargo run -p alloc-sim --example compare
//! ```

use alloc_sim::{driver, SimConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = SimConfig {
        capacity: "1M".into(),
        repeats: 50_000,
        max_len: 100,
        dealloc_percent: 95,
        seed: Some(42),
    };

    let comparison = driver::run_comparison(&config)?;

    println!("{}", comparison.baseline.summary());
    println!("{}", comparison.pool.summary());
    println!();
    println!("{}", comparison.pool_stats.render_table());
    println!("{}", comparison.summary());

    Ok(())
}
