use crate::piece::Piece;
use crate::types::{Cell, PlayState, BOARD_HEIGHT, BOARD_WIDTH};

pub type BoardGrid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// Read-only view handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: BoardGrid,
    pub current: Option<Piece>,
    /// Landing position of `current`
    pub ghost: Option<Piece>,
    pub next: Option<Piece>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub fall_interval_ms: u32,
    pub state: PlayState,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn paused(&self) -> bool {
        self.state == PlayState::Paused
    }

    pub fn game_over(&self) -> bool {
        self.state == PlayState::GameOver
    }

    pub fn playable(&self) -> bool {
        self.state == PlayState::Running
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: None,
            ghost: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            fall_interval_ms: 0,
            state: PlayState::Uninitialized,
        }
    }
}
