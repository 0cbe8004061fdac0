// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Allocation statistics for profiling and diagnostics.
//!
//! [`PoolStats`] holds the raw monotone counters the pool maintains on
//! its hot paths; [`StatsSnapshot`] combines them with the derived
//! quantities (bump tail, reusable map bytes) into a serializable,
//! printable report.

/// Monotone counters of pool activity, attributed by placement path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PoolStats {
    /// Allocations served by advancing the bump cursor.
    pub allocs_from_bump: u64,
    /// Allocations served by the ordered map scan.
    pub allocs_from_map: u64,
    /// Allocations served through the cache slot.
    pub allocs_from_cache: u64,
    /// Completed deallocations.
    pub frees: u64,
}

impl PoolStats {
    /// Total successful allocations across all three paths.
    pub fn total_allocs(&self) -> u64 {
        self.allocs_from_bump + self.allocs_from_map + self.allocs_from_cache
    }

    pub(crate) fn record_bump_alloc(&mut self) {
        self.allocs_from_bump += 1;
    }

    pub(crate) fn record_map_alloc(&mut self) {
        self.allocs_from_map += 1;
    }

    pub(crate) fn record_cache_alloc(&mut self) {
        self.allocs_from_cache += 1;
    }

    pub(crate) fn record_free(&mut self) {
        self.frees += 1;
    }
}

/// A point-in-time statistics report: counters plus derived usage
/// figures.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatsSnapshot {
    /// Fixed pool capacity in bytes.
    pub capacity_bytes: usize,
    /// Bytes consumed by the bump cursor (the used prefix).
    pub used_bytes: usize,
    /// Bytes never handed out: `capacity - used`.
    pub free_in_bump_tail: usize,
    /// Bytes sitting in free map blocks, available for recycling.
    pub free_in_map: usize,
    /// Allocations served from the bump region.
    pub allocs_from_bump: u64,
    /// Allocations served from the map scan.
    pub allocs_from_map: u64,
    /// Allocations served from the cache slot.
    pub allocs_from_cache: u64,
    /// Sum of the three allocation counters.
    pub total_allocs: u64,
    /// Completed deallocations.
    pub frees: u64,
}

impl StatsSnapshot {
    /// Returns a one-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Allocs: {} total ({} bump, {} map, {} cache), {} frees, \
             {} B used of {} B, {} B reusable in map",
            self.total_allocs,
            self.allocs_from_bump,
            self.allocs_from_map,
            self.allocs_from_cache,
            self.frees,
            self.used_bytes,
            self.capacity_bytes,
            self.free_in_map,
        )
    }

    /// Renders the statistics table.
    pub fn render_table(&self) -> String {
        let border = format!("+{}+\n", "-".repeat(55));
        let mut out = String::new();
        out.push_str(&border);
        out.push_str(&format!("|{:^55}|\n", "Storage Pool Statistics"));
        out.push_str(&border);
        let row = |label: &str, value: String, unit: &str| {
            format!("| {:<32} : {:<12} {:<5} |\n", label, value, unit)
        };
        out.push_str(&row(
            "Total pool capacity",
            self.capacity_bytes.to_string(),
            "bytes",
        ));
        out.push_str(&row(
            "Used by bump cursor",
            self.used_bytes.to_string(),
            "bytes",
        ));
        out.push_str(&row(
            "Available in bump tail",
            self.free_in_bump_tail.to_string(),
            "bytes",
        ));
        out.push_str(&row(
            "Reusable in memory map",
            self.free_in_map.to_string(),
            "bytes",
        ));
        out.push_str(&row("Total allocations", self.total_allocs.to_string(), ""));
        out.push_str(&row(
            " a) from bump region",
            self.allocs_from_bump.to_string(),
            "",
        ));
        out.push_str(&row(
            " b) from map scan",
            self.allocs_from_map.to_string(),
            "",
        ));
        out.push_str(&row(
            " c) from cache slot",
            self.allocs_from_cache.to_string(),
            "",
        ));
        out.push_str(&row("Total frees", self.frees.to_string(), ""));
        out.push_str(&border);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counters() {
        let stats = PoolStats::default();
        assert_eq!(stats.total_allocs(), 0);
        assert_eq!(stats.frees, 0);
    }

    #[test]
    fn test_total_allocs_sums_paths() {
        let mut stats = PoolStats::default();
        stats.record_bump_alloc();
        stats.record_bump_alloc();
        stats.record_map_alloc();
        stats.record_cache_alloc();
        stats.record_free();

        assert_eq!(stats.allocs_from_bump, 2);
        assert_eq!(stats.allocs_from_map, 1);
        assert_eq!(stats.allocs_from_cache, 1);
        assert_eq!(stats.total_allocs(), 4);
        assert_eq!(stats.frees, 1);
    }

    fn snapshot() -> StatsSnapshot {
        StatsSnapshot {
            capacity_bytes: 1000,
            used_bytes: 350,
            free_in_bump_tail: 650,
            free_in_map: 200,
            allocs_from_bump: 3,
            allocs_from_map: 1,
            allocs_from_cache: 2,
            total_allocs: 6,
            frees: 4,
        }
    }

    #[test]
    fn test_summary_mentions_counters() {
        let s = snapshot().summary();
        assert!(s.contains("6 total"));
        assert!(s.contains("3 bump"));
        assert!(s.contains("4 frees"));
        assert!(s.contains("200 B reusable"));
    }

    #[test]
    fn test_render_table_shape() {
        let table = snapshot().render_table();
        let lines: Vec<&str> = table.lines().collect();
        // Three borders + title + nine rows.
        assert_eq!(lines.len(), 13);
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
        assert!(table.contains("Storage Pool Statistics"));
        assert!(table.contains("Reusable in memory map"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&snapshot()).unwrap();
        assert!(json.contains("\"total_allocs\":6"));
        assert!(json.contains("\"free_in_map\":200"));
    }
}
