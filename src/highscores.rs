//! High score table
//!
//! Persisted as JSON, keeps the top `capacity` scores (5 by default).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_HIGH_SCORES;
use crate::error::{Error, Result};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInfo {
    pub name: String,
    pub score: u64,
}

impl ScoreInfo {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// High score table, sorted by descending score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoresTable {
    capacity: usize,
    entries: Vec<ScoreInfo>,
}

impl Default for HighScoresTable {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORES)
    }
}

impl HighScoresTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[ScoreInfo] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rank `score` would take (1-indexed); ties go below existing entries
    pub fn rank(&self, score: u64) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.rank(score) <= self.capacity
    }

    /// Insert `info` if it makes the table; returns the rank achieved
    pub fn add(&mut self, info: ScoreInfo) -> Option<usize> {
        let rank = self.rank(info.score);
        if rank > self.capacity {
            return None;
        }
        self.entries.insert(rank - 1, info);
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    /// Load a table from a JSON file; a missing file gives an empty table
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        let mut table: Self = serde_json::from_str(&json).map_err(|e| Error::json(path, e))?;
        // Hand-edited files may be out of order
        table.entries.sort_by(|a, b| b.score.cmp(&a.score));
        table.entries.truncate(table.capacity);
        log::info!("Loaded {} high scores", table.entries.len());
        Ok(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::json(path, e))?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
