// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the simulation driver.

/// Errors that can occur while configuring or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The configuration is unreadable or inconsistent.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The pool reported an error the driver cannot absorb.
    #[error("pool error: {0}")]
    Pool(#[from] storage_manager::PoolError),
}
