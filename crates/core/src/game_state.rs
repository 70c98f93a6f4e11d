//! Game state module - the simulation
//!
//! Ties board, pieces and scoring together: piece lifecycle, gravity timing,
//! line clears, leveling, the Running/Paused/GameOver state machine and the
//! save-record conversion. Rendering, audio and storage stay outside; side
//! effects are queued as [`GameEvent`]s for collaborators to drain.

use arrayvec::ArrayVec;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::Board;
use crate::error::RecordError;
use crate::piece::Piece;
use crate::record::SaveRecord;
use crate::scoring::{fall_interval_ms, level_for_lines, line_clear_points};
use crate::snapshot::GameSnapshot;
use crate::types::{PlayState, BASE_FALL_MS};

/// Pending events beyond this are dropped until the queue is drained.
const EVENT_CAPACITY: usize = 8;

/// Something collaborators may want to react to (sound cues, prompts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Rotated,
    Dropped,
    LinesCleared(u32),
    GameOver { final_score: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    score: u32,
    level: u32,
    lines: u32,
    fall_interval_ms: u32,
    state: PlayState,
    last_fall_ms: u64,
    seed: u64,
    rng: StdRng,
    events: ArrayVec<GameEvent, EVENT_CAPACITY>,
}

impl GameState {
    /// Create an uninitialized game whose piece sequence derives from `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            board: Board::new(),
            current: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            fall_interval_ms: BASE_FALL_MS,
            state: PlayState::Uninitialized,
            last_fall_ms: 0,
            seed,
            rng: StdRng::seed_from_u64(seed),
            events: ArrayVec::new(),
        }
    }

    /// Reset everything and spawn the first piece
    pub fn init(&mut self, now_ms: u64) {
        self.board.clear();
        self.current = None;
        self.next = None;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.fall_interval_ms = BASE_FALL_MS;
        self.state = PlayState::Running;
        self.last_fall_ms = now_ms;
        self.events.clear();

        // The first call only fills `next`; the second promotes it.
        self.advance_piece();
        self.advance_piece();
        info!(seed = self.seed, "game started");
    }

    /// Discard the current game and start over
    pub fn restart(&mut self, now_ms: u64) {
        self.init(now_ms);
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn paused(&self) -> bool {
        self.state == PlayState::Paused
    }

    pub fn game_over(&self) -> bool {
        self.state == PlayState::GameOver
    }

    pub fn is_running(&self) -> bool {
        self.state == PlayState::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    pub fn last_fall_ms(&self) -> u64 {
        self.last_fall_ms
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    /// Score to offer for the high-score table once the game has ended
    pub fn final_score(&self) -> Option<u32> {
        self.game_over().then_some(self.score)
    }

    /// Landing position of the current piece
    pub fn ghost(&self) -> Option<Piece> {
        self.current.as_ref().map(|p| self.board.ghost_of(p))
    }

    /// Drain queued events, oldest first
    pub fn take_events(&mut self) -> ArrayVec<GameEvent, EVENT_CAPACITY> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.try_push(event).is_err() {
            debug!(?event, "event queue full, dropping");
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        for (dst, src) in out.board.iter_mut().zip(self.board.rows()) {
            dst.copy_from_slice(src);
        }
        out.current = self.current;
        out.ghost = self.ghost();
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.fall_interval_ms = self.fall_interval_ms;
        out.state = self.state;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Promote the next piece (or a fresh one when there is none) to current,
    /// generate a new next piece, and move current to the spawn position.
    ///
    /// A spawn that collides ends the game.
    pub fn advance_piece(&mut self) {
        let mut piece = match self.next.take() {
            Some(piece) => piece,
            None => Piece::random(&mut self.rng),
        };
        self.next = Some(Piece::random(&mut self.rng));
        piece.reset_to_spawn();

        let blocked = !self.board.is_valid_position(&piece);
        debug!(color = piece.color.as_str(), col = piece.col, blocked, "spawn");
        self.current = Some(piece);

        if blocked && self.state != PlayState::GameOver {
            self.state = PlayState::GameOver;
            info!(score = self.score, lines = self.lines, "game over");
            self.push_event(GameEvent::GameOver {
                final_score: self.score,
            });
        }
    }

    /// Gravity step. Returns true when a fall step was due this call.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.state != PlayState::Running {
            return false;
        }
        if now_ms.saturating_sub(self.last_fall_ms) <= u64::from(self.fall_interval_ms) {
            return false;
        }

        if !self.try_move(0, 1) {
            self.lock_piece();
        }
        self.last_fall_ms = now_ms;
        true
    }

    /// Translate the current piece, reverting if the result is invalid
    pub fn try_move(&mut self, d_col: i16, d_row: i16) -> bool {
        if self.state != PlayState::Running {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        piece.move_by(d_col, d_row);
        if self.board.is_valid_position(piece) {
            return true;
        }
        piece.move_by(-d_col, -d_row);
        false
    }

    /// Manual one-row drop; restarts the gravity timer on success
    pub fn soft_drop(&mut self, now_ms: u64) -> bool {
        let moved = self.try_move(0, 1);
        if moved {
            self.last_fall_ms = now_ms;
        }
        moved
    }

    /// Rotate clockwise, trying one column left then one column right when
    /// the rotated shape does not fit in place.
    pub fn rotate(&mut self) -> bool {
        if self.state != PlayState::Running {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        let original = *piece;
        piece.rotate();
        if !self.board.is_valid_position(piece) {
            piece.move_by(-1, 0);
            if !self.board.is_valid_position(piece) {
                piece.move_by(2, 0);
                if !self.board.is_valid_position(piece) {
                    *piece = original;
                    return false;
                }
            }
        }

        self.push_event(GameEvent::Rotated);
        true
    }

    /// Drop the current piece to its landing row and lock it
    pub fn hard_drop(&mut self) -> bool {
        if self.state != PlayState::Running {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        let started_valid = self.board.is_valid_position(piece);
        while self.board.is_valid_position(piece) {
            piece.move_by(0, 1);
        }
        piece.move_by(0, -1);

        if started_valid {
            self.push_event(GameEvent::Dropped);
        }
        self.lock_piece();
        true
    }

    /// Fix the current piece into the board, clear lines, update score and
    /// level, then spawn the next piece.
    pub fn lock_piece(&mut self) {
        if self.state != PlayState::Running {
            return;
        }
        let Some(piece) = self.current.take() else {
            return;
        };

        self.board.place(&piece);
        let cleared = self.board.clear_full_lines() as u32;

        if cleared > 0 {
            let points = line_clear_points(cleared, self.level);
            self.score = self.score.saturating_add(points);
            self.lines = self.lines.saturating_add(cleared);

            let level = level_for_lines(self.lines);
            if level > self.level {
                self.level = level;
                self.fall_interval_ms = fall_interval_ms(level);
                info!(level, fall_ms = self.fall_interval_ms, "level up");
            }
            debug!(cleared, points, score = self.score, "lines cleared");
            self.push_event(GameEvent::LinesCleared(cleared));
        }

        self.advance_piece();
    }

    /// Running <-> Paused. Resuming restarts the gravity timer at `now_ms` so
    /// paused time does not count toward the next fall.
    pub fn toggle_pause(&mut self, now_ms: u64) -> bool {
        match self.state {
            PlayState::Running => {
                self.state = PlayState::Paused;
                true
            }
            PlayState::Paused => {
                self.state = PlayState::Running;
                self.last_fall_ms = now_ms;
                true
            }
            PlayState::GameOver | PlayState::Uninitialized => false,
        }
    }

    /// Save record for the current game, or `None` when there is nothing
    /// worth saving (game over or no pieces yet).
    pub fn to_record(&self) -> Option<SaveRecord> {
        if self.state == PlayState::GameOver {
            return None;
        }
        let current = self.current.as_ref()?;
        let next = self.next.as_ref()?;

        Some(SaveRecord {
            board_grid: self.board.to_grid(),
            current_piece: current.to_record(),
            next_piece: next.to_record(),
            score: self.score,
            level: self.level,
            lines_cleared: self.lines,
            fall_interval_ms: self.fall_interval_ms,
        })
    }

    /// Replace the game with a saved record and resume play.
    ///
    /// The record is fully validated first; on error nothing changes.
    pub fn restore(&mut self, record: &SaveRecord, now_ms: u64) -> Result<(), RecordError> {
        let board = Board::from_grid(&record.board_grid)?;
        let current = Piece::from_record(&record.current_piece)?;
        let next = Piece::from_record(&record.next_piece)?;
        if !board.is_valid_position(&current) {
            return Err(RecordError::PieceCollides {
                col: current.col,
                row: current.row,
            });
        }
        if record.level == 0 {
            return Err(RecordError::InvalidLevel);
        }
        if record.fall_interval_ms == 0 {
            return Err(RecordError::InvalidFallInterval);
        }

        self.board = board;
        self.current = Some(current);
        self.next = Some(next);
        self.score = record.score;
        self.level = record.level;
        self.lines = record.lines_cleared;
        self.fall_interval_ms = record.fall_interval_ms;
        self.state = PlayState::Running;
        self.last_fall_ms = now_ms;
        self.events.clear();

        info!(score = self.score, level = self.level, "game restored");
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
