// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # alloc-sim
//!
//! Randomized allocate/free benchmark driver for the
//! [`storage_manager`] pool. The driver pre-generates a schedule of
//! request sizes, then replays it twice — once against the pool, once
//! against the host allocator — with identical deallocation decisions,
//! and reports the comparative wall-clock time together with the pool's
//! own placement statistics.
//!
//! # Example
//! ```
//! use alloc_sim::{driver, SimConfig};
//!
//! let config = SimConfig {
//!     capacity: "64K".into(),
//!     repeats: 1_000,
//!     max_len: 64,
//!     dealloc_percent: 90,
//!     seed: Some(42),
//! };
//!
//! let comparison = driver::run_comparison(&config).unwrap();
//! assert_eq!(comparison.baseline.allocs_ok, 1_000);
//! println!("{}", comparison.summary());
//! ```

mod config;
pub mod driver;
mod error;
mod report;
mod schedule;

pub use config::SimConfig;
pub use error::SimError;
pub use report::{Comparison, SimReport};
pub use schedule::RequestSchedule;
