// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pre-generated request schedules.
//!
//! Request sizes are drawn up front, before any clock starts, so the
//! comparative runs measure allocator work and nothing else. The
//! schedule also pins the seed the driver re-uses for its deallocation
//! decisions: both runs see the identical workload.

use crate::SimConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A fixed sequence of request sizes plus the seed that produced it.
#[derive(Debug, Clone)]
pub struct RequestSchedule {
    sizes: Vec<usize>,
    seed: u64,
}

impl RequestSchedule {
    /// Generates `config.repeats` sizes uniform in `[1, config.max_len]`.
    ///
    /// With `config.seed` unset, a fresh seed is drawn and recorded so
    /// the run can still be reproduced from the report output.
    pub fn generate(config: &SimConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let sizes = (0..config.repeats)
            .map(|_| rng.gen_range(1..=config.max_len))
            .collect();
        Self { sizes, seed }
    }

    /// The request sizes, in issue order.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// The seed behind this schedule (and the driver's dealloc choices).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of all request sizes, before the driver's +1 terminator byte.
    pub fn total_bytes(&self) -> u64 {
        self.sizes.iter().map(|&s| s as u64).sum()
    }
}
