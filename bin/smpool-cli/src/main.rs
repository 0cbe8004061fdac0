// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # smpool
//!
//! Command-line interface for the storage-pool allocator benchmark.
//!
//! ## Usage
//! ```bash
//! # Comparative benchmark against the host allocator
//! smpool bench --capacity 10M --repeats 250000 --dealloc-percent 95
//!
//! # Same run, machine-readable
//! smpool bench --seed 42 --json
//!
//! # Exercise a small pool and print its memory map
//! smpool inspect --capacity 1K --ops 32
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "smpool",
    about = "Pooled bump-plus-reclaim allocator benchmark",
    version
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the randomized schedule against the pool and the host
    /// allocator, and compare.
    Bench {
        /// Path to a TOML configuration file (overrides the other
        /// arguments).
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Pool capacity (e.g., "512K", "10M", "1G").
        #[arg(long, default_value = "10M")]
        capacity: String,

        /// Number of allocation requests.
        #[arg(long, default_value_t = 250_000)]
        repeats: usize,

        /// Maximum request size in bytes.
        #[arg(long, default_value_t = 100)]
        max_len: usize,

        /// Percentage chance (0-100) of freeing a random live block
        /// after each allocation.
        #[arg(long, default_value_t = 95)]
        dealloc_percent: u8,

        /// RNG seed for a reproducible run.
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the full comparison as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Exercise a small pool, then print its memory map and statistics.
    Inspect {
        /// Pool capacity (e.g., "1K").
        #[arg(long, default_value = "1K")]
        capacity: String,

        /// Number of allocation requests to issue.
        #[arg(long, default_value_t = 32)]
        ops: usize,

        /// Maximum request size in bytes.
        #[arg(long, default_value_t = 64)]
        max_len: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Bench {
            config,
            capacity,
            repeats,
            max_len,
            dealloc_percent,
            seed,
            json,
        } => commands::bench::execute(
            config,
            capacity,
            repeats,
            max_len,
            dealloc_percent,
            seed,
            json,
        ),
        Commands::Inspect {
            capacity,
            ops,
            max_len,
            seed,
        } => commands::inspect::execute(capacity, ops, max_len, seed),
    }
}
