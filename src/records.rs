//! Best-run records
//!
//! Persisted to LocalStorage, tracks the top 10 runs by score.

use serde::{Deserialize, Serialize};

use crate::sim::RunSummary;

/// Maximum number of records to keep
pub const MAX_RECORDS: usize = 10;

/// One finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Elapsed ticks survived
    pub score: u64,
    /// Coins collected during the run
    pub coins: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Local leaderboard of best runs
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunRecords {
    pub entries: Vec<RunRecord>,
}

impl RunRecords {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "crown_runner_records";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_RECORDS {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run if it qualifies. Returns the rank achieved
    /// (1-indexed) or None.
    pub fn record(&mut self, summary: RunSummary, timestamp: f64) -> Option<usize> {
        if !self.qualifies(summary.score) {
            return None;
        }

        let entry = RunRecord {
            score: summary.score,
            coins: summary.coins_collected,
            timestamp,
        };

        // Insertion point, sorted descending by score
        let pos = self.entries.iter().position(|e| summary.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_RECORDS);
        Some(rank)
    }

    /// Best score so far (if any)
    pub fn best_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(storage) = crate::platform::local_storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(records) = serde_json::from_str::<RunRecords>(&json) {
                    log::info!("Loaded {} run records", records.entries.len());
                    return records;
                }
            }
        }
        log::info!("No run records found, starting fresh");
        Self::new()
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Some(storage) = crate::platform::local_storage() {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Run records saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64, coins: u32) -> RunSummary {
        RunSummary {
            score,
            coins_collected: coins,
        }
    }

    #[test]
    fn zero_score_never_qualifies() {
        let records = RunRecords::new();
        assert!(!records.qualifies(0));
    }

    #[test]
    fn records_sort_descending_and_rank() {
        let mut records = RunRecords::new();
        assert_eq!(records.record(run(100, 2), 0.0), Some(1));
        assert_eq!(records.record(run(300, 5), 1.0), Some(1));
        assert_eq!(records.record(run(200, 1), 2.0), Some(2));
        let scores: Vec<u64> = records.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
        assert_eq!(records.best_score(), Some(300));
    }

    #[test]
    fn board_truncates_at_max() {
        let mut records = RunRecords::new();
        for score in 1..=(MAX_RECORDS as u64 + 5) {
            records.record(run(score, 0), 0.0);
        }
        assert_eq!(records.entries.len(), MAX_RECORDS);
        // Lowest scores fell off
        assert!(!records.qualifies(1));
        assert!(records.qualifies(MAX_RECORDS as u64 + 6));
    }
}
