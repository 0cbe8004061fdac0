// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the storage pool.
//!
//! None of these are fatal: the pool never aborts the host process, and a
//! failed call leaves pool state untouched. Callers decide whether a
//! failed allocation or an unknown address is worth more than a log line.

/// Errors that can occur during pool operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Neither the bump tail nor any recorded free block can satisfy the
    /// request.
    #[error("out of capacity: requested {requested} bytes ({bump_tail} left in bump tail, {reusable} reusable in map)")]
    OutOfCapacity {
        requested: usize,
        bump_tail: usize,
        reusable: usize,
    },

    /// Attempted to allocate a zero-sized block.
    #[error("cannot allocate zero-sized block")]
    ZeroSizedRequest,

    /// The address passed to `deallocate` was never handed out by this
    /// pool, or was merged away by coalescing.
    #[error("unknown block address 0x{offset:08x}")]
    UnknownAddress { offset: usize },

    /// A capacity string could not be parsed.
    #[error("invalid capacity: {0}")]
    InvalidCapacity(String),
}
