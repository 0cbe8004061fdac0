// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulation configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! capacity = "10M"
//! repeats = 250000
//! max_len = 100
//! dealloc_percent = 95
//! seed = 42
//! ```

use crate::SimError;
use std::path::Path;
use storage_manager::PoolCapacity;

/// Parameters for one comparative simulation run.
///
/// The defaults give the stock workload: a 10 MiB pool,
/// 250 000 requests of 1–100 bytes, and a 95% chance of freeing one
/// random live block after each successful allocation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimConfig {
    /// Pool capacity (human-readable, e.g. `"10M"`).
    pub capacity: String,
    /// Number of allocation requests to issue.
    pub repeats: usize,
    /// Maximum request size in bytes; sizes are uniform in `[1, max_len]`.
    /// The driver asks for one extra byte per request for a terminator.
    pub max_len: usize,
    /// Percentage chance (0–100) of deallocating one random live block
    /// after each successful allocation.
    pub dealloc_percent: u8,
    /// RNG seed. `None` draws a fresh one; set it to make runs
    /// reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SimError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| SimError::ConfigError(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, SimError> {
        toml::to_string_pretty(self)
            .map_err(|e| SimError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks the parameters for consistency.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.repeats == 0 {
            return Err(SimError::ConfigError("repeats must be positive".into()));
        }
        if self.max_len == 0 {
            return Err(SimError::ConfigError("max_len must be positive".into()));
        }
        if self.dealloc_percent > 100 {
            return Err(SimError::ConfigError(format!(
                "dealloc_percent must be 0-100, got {}",
                self.dealloc_percent
            )));
        }
        self.parse_capacity().map(|_| ())
    }

    /// Parses the capacity string into a [`PoolCapacity`].
    pub fn parse_capacity(&self) -> Result<PoolCapacity, SimError> {
        PoolCapacity::parse(&self.capacity)
            .map_err(|e| SimError::ConfigError(format!("invalid capacity: {e}")))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: "10M".to_string(),
            repeats: 250_000,
            max_len: 100,
            dealloc_percent: 95,
            seed: None,
        }
    }
}
