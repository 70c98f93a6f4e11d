//! High-score table - bounded, descending, persisted as JSON
//!
//! At most [`HIGH_SCORE_LIMIT`] entries, ordered by score from highest to
//! lowest. Equal scores keep insertion order: a new entry goes after every
//! existing entry with the same score.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::types::HIGH_SCORE_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    /// Unix time in milliseconds
    pub timestamp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HighScoreEntry>", into = "Vec<HighScoreEntry>")]
pub struct HighScoreTable {
    entries: ArrayVec<HighScoreEntry, HIGH_SCORE_LIMIT>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `score` would earn a place in the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        !self.entries.is_full() || self.entries.last().is_some_and(|e| score > e.score)
    }

    /// Insert a score, returning its 0-based rank.
    ///
    /// Returns `None` when the name is blank or the score does not make the
    /// table.
    pub fn record(&mut self, name: &str, score: u32, timestamp: u64) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let rank = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());
        if rank >= HIGH_SCORE_LIMIT {
            return None;
        }
        if self.entries.is_full() {
            self.entries.pop();
        }
        self.entries.insert(
            rank,
            HighScoreEntry {
                name: name.to_string(),
                score,
                timestamp,
            },
        );
        Some(rank)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<Vec<HighScoreEntry>> for HighScoreTable {
    /// Normalizes whatever was stored: blank names dropped, sorted
    /// descending (stable), truncated to the limit.
    fn from(mut entries: Vec<HighScoreEntry>) -> Self {
        entries.retain(|e| !e.name.trim().is_empty());
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self {
            entries: entries.into_iter().take(HIGH_SCORE_LIMIT).collect(),
        }
    }
}

impl From<HighScoreTable> for Vec<HighScoreEntry> {
    fn from(table: HighScoreTable) -> Self {
        table.entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(table: &HighScoreTable) -> Vec<u32> {
        table.entries().iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_keeps_descending_order() {
        let mut table = HighScoreTable::new();
        table.record("a", 300, 1);
        table.record("b", 900, 2);
        table.record("c", 100, 3);
        table.record("d", 500, 4);
        assert_eq!(scores(&table), vec![900, 500, 300, 100]);
    }

    #[test]
    fn test_eleven_scores_keep_top_ten() {
        let mut table = HighScoreTable::new();
        for (i, score) in [50, 10, 110, 30, 90, 70, 20, 100, 60, 80, 40].iter().enumerate() {
            table.record(&format!("p{}", i), *score, i as u64);
        }
        assert_eq!(table.len(), 10);
        assert_eq!(
            scores(&table),
            vec![110, 100, 90, 80, 70, 60, 50, 40, 30, 20]
        );
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let mut table = HighScoreTable::new();
        assert_eq!(table.record("", 500, 0), None);
        assert_eq!(table.record("   ", 500, 0), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut table = HighScoreTable::new();
        table.record("first", 200, 1);
        table.record("second", 200, 2);
        assert_eq!(table.record("third", 200, 3), Some(2));
        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_low_score_does_not_enter_full_table() {
        let mut table = HighScoreTable::new();
        for i in 0..10 {
            table.record("p", 100 + i, 0);
        }
        assert!(!table.qualifies(100));
        assert_eq!(table.record("late", 100, 0), None);
        assert!(table.qualifies(101));
        assert_eq!(table.record("late", 101, 0), Some(9));
        assert_eq!(table.entries().last().unwrap().name, "late");
    }

    #[test]
    fn test_zero_never_qualifies() {
        assert!(!HighScoreTable::new().qualifies(0));
        assert!(HighScoreTable::new().qualifies(1));
    }

    #[test]
    fn test_json_normalizes_stored_list() {
        let text = r#"[
            {"name":"low","score":5,"timestamp":1},
            {"name":"","score":999,"timestamp":2},
            {"name":"high","score":50,"timestamp":3}
        ]"#;
        let table = HighScoreTable::from_json(text).unwrap();
        assert_eq!(scores(&table), vec![50, 5]);

        let back = HighScoreTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(back, table);
    }
}
