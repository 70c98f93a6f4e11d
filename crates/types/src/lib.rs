//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data (plus serde derives), usable from the
//! simulation, the renderer, the input layer and the persistence codec alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//!
//! # Timing and Progression
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TICK_MS` | 16 | Default driver cadence (~60 FPS) |
//! | `BASE_FALL_MS` | 1000 | Gravity interval at level 1 |
//! | `FALL_STEP_MS` | 50 | Interval reduction per level |
//! | `MIN_FALL_MS` | 100 | Gravity floor |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines needed per level |

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Default driver cadence in milliseconds (16ms ≈ 60 FPS)
pub const DEFAULT_TICK_MS: u32 = 16;

/// Gravity interval at level 1 (one row per second)
pub const BASE_FALL_MS: u32 = 1000;

/// Gravity speed-up per level gained
pub const FALL_STEP_MS: u32 = 50;

/// Fastest gravity interval
pub const MIN_FALL_MS: u32 = 100;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per lock, indexed by the number of lines cleared (multiplied by level).
///
/// Counts above 4 use the last entry.
pub const LINE_CLEAR_POINTS: [u32; 5] = [0, 100, 300, 500, 800];

/// Number of entries kept in the high-score table
pub const HIGH_SCORE_LIMIT: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_defaults() {
        assert_eq!(BASE_FALL_MS, 1000);
        assert_eq!(FALL_STEP_MS, 50);
        assert_eq!(MIN_FALL_MS, 100);
        assert_eq!(LINES_PER_LEVEL, 10);
        assert_eq!(LINE_CLEAR_POINTS, [0, 100, 300, 500, 800]);
        assert_eq!(HIGH_SCORE_LIMIT, 10);
    }

    #[test]
    fn color_serializes_lowercase() {
        let json = serde_json::to_string(&PieceColor::Orange).unwrap();
        assert_eq!(json, "\"orange\"");
        let back: PieceColor = serde_json::from_str("\"purple\"").unwrap();
        assert_eq!(back, PieceColor::Purple);
    }

    #[test]
    fn every_kind_has_a_distinct_color() {
        let mut colors: Vec<PieceColor> = PieceKind::ALL.iter().map(|k| k.color()).collect();
        colors.sort_by_key(|c| c.as_str());
        colors.dedup();
        assert_eq!(colors.len(), 7);
    }
}

/// The seven canonical piece kinds
///
/// Each kind has a fixed color:
/// - **I**: Cyan, horizontal bar
/// - **J**: Blue
/// - **L**: Orange (mirror of J)
/// - **O**: Yellow, 2x2 square
/// - **S**: Green
/// - **T**: Purple
/// - **Z**: Red (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Color tag painted into the board when a piece of this kind locks
    pub fn color(&self) -> PieceColor {
        match self {
            PieceKind::I => PieceColor::Cyan,
            PieceKind::J => PieceColor::Blue,
            PieceKind::L => PieceColor::Orange,
            PieceKind::O => PieceColor::Yellow,
            PieceKind::S => PieceColor::Green,
            PieceKind::T => PieceColor::Purple,
            PieceKind::Z => PieceColor::Red,
        }
    }
}

/// Color tag stored in occupied board cells and in saved pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

impl PieceColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceColor::Cyan => "cyan",
            PieceColor::Blue => "blue",
            PieceColor::Orange => "orange",
            PieceColor::Yellow => "yellow",
            PieceColor::Green => "green",
            PieceColor::Purple => "purple",
            PieceColor::Red => "red",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceColor)`: Cell filled by a locked piece of that color
pub type Cell = Option<PieceColor>;

/// Lifecycle of a simulation
///
/// `Uninitialized` only exists between construction and the first `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayState {
    #[default]
    Uninitialized,
    Running,
    Paused,
    GameOver,
}

/// Input actions, each mapped 1:1 to a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Move piece one row down
    SoftDrop,
    /// Rotate piece 90° clockwise (with simple wall kick)
    Rotate,
    /// Drop piece to its landing row and lock it
    HardDrop,
    /// Toggle pause
    Pause,
    /// Start a fresh game
    Restart,
    /// Toggle audio mute
    ToggleMute,
    /// Save the running game
    Save,
    /// Load the saved game
    Load,
}

/// Discrete audio cues emitted by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Clear,
    Drop,
    Rotate,
    GameOver,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Clear => "clear",
            SoundCue::Drop => "drop",
            SoundCue::Rotate => "rotate",
            SoundCue::GameOver => "gameover",
        }
    }
}
