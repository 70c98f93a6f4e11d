//! Line editor for the high-score name prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Name offered when the prompt opens
pub const DEFAULT_NAME: &str = "Player";

/// Longest name accepted, in characters
pub const MAX_NAME_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEntryOutcome {
    /// Keep editing
    Editing,
    /// Enter pressed
    Submit,
    /// Esc pressed
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    buffer: String,
}

impl NameEntry {
    pub fn new() -> Self {
        Self {
            buffer: DEFAULT_NAME.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> NameEntryOutcome {
        match key.code {
            KeyCode::Enter => NameEntryOutcome::Submit,
            KeyCode::Esc => NameEntryOutcome::Cancel,
            KeyCode::Backspace => {
                self.buffer.pop();
                NameEntryOutcome::Editing
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.clear();
                NameEntryOutcome::Editing
            }
            KeyCode::Char(c)
                if !c.is_control()
                    && !key.modifiers.contains(KeyModifiers::CONTROL)
                    && self.buffer.chars().count() < MAX_NAME_LEN =>
            {
                self.buffer.push(c);
                NameEntryOutcome::Editing
            }
            _ => NameEntryOutcome::Editing,
        }
    }
}

impl Default for NameEntry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_starts_with_default_name() {
        assert_eq!(NameEntry::new().as_str(), "Player");
    }

    #[test]
    fn test_editing() {
        let mut entry = NameEntry::new();
        entry.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(entry.as_str(), "");
        for c in "ada".chars() {
            assert_eq!(entry.handle_key(key(KeyCode::Char(c))), NameEntryOutcome::Editing);
        }
        entry.handle_key(key(KeyCode::Backspace));
        assert_eq!(entry.as_str(), "ad");
        assert_eq!(entry.handle_key(key(KeyCode::Enter)), NameEntryOutcome::Submit);
        assert_eq!(entry.handle_key(key(KeyCode::Esc)), NameEntryOutcome::Cancel);
    }

    #[test]
    fn test_length_is_capped() {
        let mut entry = NameEntry::new();
        for _ in 0..40 {
            entry.handle_key(key(KeyCode::Char('x')));
        }
        assert_eq!(entry.as_str().chars().count(), MAX_NAME_LEN);
    }
}
