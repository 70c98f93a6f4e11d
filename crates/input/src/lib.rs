//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides
//! the small line editor used by the high-score name prompt.

pub mod map;
pub mod name_entry;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
pub use name_entry::{NameEntry, NameEntryOutcome, DEFAULT_NAME, MAX_NAME_LEN};
