//! Core game logic - deterministic and testable
//!
//! Everything that decides how the game plays lives here; nothing in this
//! crate draws to a terminal or touches the filesystem. Storage and audio are
//! reached through the [`KeyValueStore`] and [`AudioSink`] traits.
//!
//! # Module Structure
//!
//! - [`shape`]: the seven 0/1 shape matrices and clockwise rotation
//! - [`piece`]: a shape, its color and its board position
//! - [`board`]: 10x20 grid with collision checks and line clearing
//! - [`game_state`]: the simulation (gravity, locking, scoring, pause, game over)
//! - [`scoring`]: points per clear, level and fall-speed curves, grades
//! - [`record`]: serializable save record
//! - [`high_scores`]: bounded, ordered high-score table
//! - [`store`] / [`audio`]: collaborator traits
//! - [`session`]: ties a game to its store and audio sink
//! - [`frame_loop`]: decides when the driver stops scheduling frames
//!
//! # Game Rules
//!
//! - Pieces are drawn uniformly at random from the seven kinds
//! - Rotation is clockwise with a one-column kick left, then right
//! - A line clear awards 100/300/500/800 points times the level
//! - Every 10 lines the level rises and gravity speeds up by 50 ms, down to 100 ms
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//!
//! let mut game = GameState::new(12345);
//! game.init(0);
//!
//! game.try_move(1, 0);
//! game.rotate();
//! game.hard_drop();
//!
//! assert!(game.is_running());
//! assert!(game.board().cells().iter().any(|c| c.is_some()));
//! ```
//!
//! # Timing
//!
//! [`GameState::tick`] takes an absolute timestamp in milliseconds and moves
//! the piece down once more than the current fall interval has passed since
//! the last fall.

pub mod audio;
pub mod board;
pub mod error;
pub mod frame_loop;
pub mod game_state;
pub mod high_scores;
pub mod piece;
pub mod record;
pub mod scoring;
pub mod session;
pub mod shape;
pub mod snapshot;
pub mod store;

pub use blockfall_types as types;

pub use audio::{AudioSink, NullAudio};
pub use board::Board;
pub use error::{AudioError, RecordError, StoreError};
pub use frame_loop::{FrameLoop, LoopStep};
pub use game_state::{GameEvent, GameState};
pub use high_scores::{HighScoreEntry, HighScoreTable};
pub use piece::Piece;
pub use record::{PieceRecord, SaveRecord};
pub use scoring::{fall_interval_ms, grade, level_for_lines, line_clear_points};
pub use session::Session;
pub use shape::ShapeMatrix;
pub use snapshot::{BoardGrid, GameSnapshot};
pub use store::{KeyValueStore, MemoryStore, HIGH_SCORES_KEY, SAVE_KEY};
