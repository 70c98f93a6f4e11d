//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It renders into a simple framebuffer that is diffed and flushed to the
//! terminal with crossterm, with no widget/layout library in between.
//!
//! Goals:
//! - Keep `core` free of terminal concerns
//! - Allow precise control over aspect ratio (2 chars wide per cell)
//! - Provide the terminal-side collaborators (renderer, bell audio)

pub mod bell;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use bell::BellAudio;
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{piece_rgb, AnchorY, GameView, HudView, Viewport};
pub use renderer::{FrameStats, TerminalRenderer};
