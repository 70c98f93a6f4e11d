//! Error types for records, storage and audio

use thiserror::Error;

use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// A persisted record could not be decoded or failed validation.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("shape matrix is empty")]
    EmptyShape,

    #[error("shape matrix rows have different lengths")]
    RaggedShape,

    #[error("shape matrix is {rows}x{cols}, limit is {max}x{max}")]
    ShapeTooLarge { rows: usize, cols: usize, max: usize },

    #[error("shape cell value {0} is not 0 or 1")]
    BadCellValue(u8),

    #[error("piece origin ({col}, {row}) is out of range")]
    OriginOutOfRange { col: i32, row: i32 },

    #[error("board grid is {rows}x{cols}, expected {}x{}", BOARD_HEIGHT, BOARD_WIDTH)]
    BoardSize { rows: usize, cols: usize },

    #[error("current piece at ({col}, {row}) overlaps the stack or leaves the board")]
    PieceCollides { col: i16, row: i16 },

    #[error("level must be at least 1")]
    InvalidLevel,

    #[error("fall interval must be positive")]
    InvalidFallInterval,

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

/// The key-value store could not be read or written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// An audio collaborator failed. Never fatal to the game.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
