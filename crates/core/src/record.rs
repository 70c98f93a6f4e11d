//! Persisted save-game record
//!
//! Flat, serde-derived mirror of the simulation state. Field names are
//! camelCase in the JSON text; timestamps are not part of the record.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::types::{Cell, PieceColor};

/// Persisted form of a [`Piece`](crate::Piece)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRecord {
    /// Nested rows of 0/1
    pub shape: Vec<Vec<u8>>,
    pub color: PieceColor,
    pub col: i32,
    pub row: i32,
}

/// Snapshot written by "save" and read back by "load"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub board_grid: Vec<Vec<Cell>>,
    pub current_piece: PieceRecord,
    pub next_piece: PieceRecord,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub fall_interval_ms: u32,
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

    fn sample() -> SaveRecord {
        let mut grid = vec![vec![None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        grid[19][0] = Some(PieceColor::Red);
        SaveRecord {
            board_grid: grid,
            current_piece: PieceRecord {
                shape: vec![vec![1, 1, 1, 1]],
                color: PieceColor::Cyan,
                col: 3,
                row: 4,
            },
            next_piece: PieceRecord {
                shape: vec![vec![0, 1, 0], vec![1, 1, 1]],
                color: PieceColor::Purple,
                col: 3,
                row: 0,
            },
            score: 1234,
            level: 5,
            lines_cleared: 42,
            fall_interval_ms: 800,
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "boardGrid",
            "currentPiece",
            "nextPiece",
            "score",
            "level",
            "linesCleared",
            "fallIntervalMs",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["boardGrid"][19][0], "red");
        assert!(value["boardGrid"][0][0].is_null());
    }

    #[test]
    fn test_json_roundtrip() {
        let record = sample();
        let back = SaveRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            SaveRecord::from_json("{\"score\": 1}"),
            Err(RecordError::Json(_))
        ));
        assert!(SaveRecord::from_json("not json").is_err());
    }
}
