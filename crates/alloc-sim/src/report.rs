// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulation results and the comparative verdict.
//!
//! [`SimReport`] captures one timed run; [`Comparison`] pairs the host
//! allocator baseline with the pool run and derives the relative
//! speed-up.

use std::time::Duration;
use storage_manager::StatsSnapshot;

/// Counters and wall-clock time for one simulation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimReport {
    /// Which allocator ran: `"storage-pool"` or `"host-allocator"`.
    pub label: String,
    /// Wall-clock time for the request loop (cleanup excluded).
    pub elapsed: Duration,
    /// Successful allocations.
    pub allocs_ok: u64,
    /// Requests the allocator could not satisfy.
    pub allocs_failed: u64,
    /// Random deallocations performed during the loop (end-of-run
    /// cleanup not included).
    pub frees: u64,
    /// Total bytes requested across successful allocations.
    pub bytes_requested: u64,
}

impl SimReport {
    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Returns a one-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.2}ms — {} allocs ok, {} failed, {} frees, {} bytes requested",
            self.label,
            self.elapsed_ms(),
            self.allocs_ok,
            self.allocs_failed,
            self.frees,
            self.bytes_requested,
        )
    }
}

/// Outcome of running the same schedule against both allocators.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Comparison {
    /// The host-allocator run.
    pub baseline: SimReport,
    /// The storage-pool run.
    pub pool: SimReport,
    /// The pool's own statistics after its run.
    pub pool_stats: StatsSnapshot,
    /// Seed behind both runs; reuse it to reproduce them.
    pub seed: u64,
}

impl Comparison {
    /// How much faster the pool ran than the baseline, as a percentage
    /// of the baseline time. Negative when the pool was slower; 0 when
    /// the baseline was too fast to measure.
    pub fn speedup_percent(&self) -> f64 {
        let baseline = self.baseline.elapsed_ms();
        if baseline <= 0.0 {
            return 0.0;
        }
        (baseline - self.pool.elapsed_ms()) / baseline * 100.0
    }

    /// Returns a short comparative summary.
    pub fn summary(&self) -> String {
        format!(
            "host {:.2}ms vs pool {:.2}ms — pool {:.1}% {} (seed {})",
            self.baseline.elapsed_ms(),
            self.pool.elapsed_ms(),
            self.speedup_percent().abs(),
            if self.speedup_percent() >= 0.0 {
                "faster"
            } else {
                "slower"
            },
            self.seed,
        )
    }
}
