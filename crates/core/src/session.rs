//! Session controller
//!
//! Owns a [`GameState`] together with its collaborators: a key-value store
//! for the save record and high-score table, and an audio sink. Front ends
//! feed it [`GameAction`]s and ticks; it forwards simulation events to audio
//! and tracks whether a finished game earned a high-score entry.

use tracing::{info, warn};

use crate::audio::AudioSink;
use crate::error::AudioError;
use crate::game_state::{GameEvent, GameState};
use crate::high_scores::HighScoreTable;
use crate::record::SaveRecord;
use crate::snapshot::GameSnapshot;
use crate::store::{KeyValueStore, HIGH_SCORES_KEY, SAVE_KEY};
use crate::types::{GameAction, SoundCue};

pub struct Session<S: KeyValueStore, A: AudioSink> {
    game: GameState,
    store: S,
    audio: A,
    high_scores: HighScoreTable,
    pending_high_score: Option<u32>,
}

impl<S: KeyValueStore, A: AudioSink> Session<S, A> {
    /// Build a session and load the stored high-score table.
    ///
    /// A missing or unreadable table starts empty.
    pub fn new(seed: u64, store: S, audio: A) -> Self {
        let high_scores = load_high_scores(&store);
        Self {
            game: GameState::new(seed),
            store,
            audio,
            high_scores,
            pending_high_score: None,
        }
    }

    /// Start a fresh game
    pub fn start(&mut self, now_ms: u64) {
        self.game.init(now_ms);
        self.pending_high_score = None;
        self.after_step();
        log_audio(self.audio.start_music(), "start music");
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.game.snapshot_into(out);
    }

    /// Final score waiting for a name, set when a game ends with a
    /// qualifying score
    pub fn pending_high_score(&self) -> Option<u32> {
        self.pending_high_score
    }

    /// Apply one player action. Returns whether it changed anything.
    pub fn apply(&mut self, action: GameAction, now_ms: u64) -> bool {
        let changed = match action {
            GameAction::MoveLeft => self.game.try_move(-1, 0),
            GameAction::MoveRight => self.game.try_move(1, 0),
            GameAction::SoftDrop => self.game.soft_drop(now_ms),
            GameAction::Rotate => self.game.rotate(),
            GameAction::HardDrop => self.game.hard_drop(),
            GameAction::Pause => self.toggle_pause(now_ms),
            GameAction::Restart => {
                self.restart(now_ms);
                true
            }
            GameAction::ToggleMute => {
                self.toggle_mute();
                true
            }
            GameAction::Save => self.save(),
            GameAction::Load => self.load(now_ms),
        };
        self.after_step();
        changed
    }

    /// Advance gravity. Returns whether a fall step happened.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let stepped = self.game.tick(now_ms);
        self.after_step();
        stepped
    }

    pub fn restart(&mut self, now_ms: u64) {
        self.game.restart(now_ms);
        self.pending_high_score = None;
        log_audio(self.audio.start_music(), "start music");
    }

    fn toggle_pause(&mut self, now_ms: u64) -> bool {
        if !self.game.toggle_pause(now_ms) {
            return false;
        }
        let result = if self.game.paused() {
            self.audio.stop_music()
        } else {
            self.audio.start_music()
        };
        log_audio(result, "toggle music");
        true
    }

    /// Flip the mute flag. Returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.audio.is_muted();
        log_audio(self.audio.set_muted(muted), "set muted");
        self.audio.is_muted()
    }

    /// Persist the current game. False when there is nothing to save or the
    /// store rejects the write.
    pub fn save(&mut self) -> bool {
        let Some(record) = self.game.to_record() else {
            info!(state = ?self.game.state(), "nothing to save");
            return false;
        };
        let text = match record.to_json() {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "failed to encode save record");
                return false;
            }
        };
        match self.store.set(SAVE_KEY, &text) {
            Ok(()) => {
                info!(score = record.score, level = record.level, "game saved");
                true
            }
            Err(err) => {
                warn!(%err, "failed to write save record");
                false
            }
        }
    }

    /// Replace the current game with the saved one. False when there is no
    /// record or it cannot be read; the current game is kept in that case.
    pub fn load(&mut self, now_ms: u64) -> bool {
        let text = match self.store.get(SAVE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                info!("no saved game");
                return false;
            }
            Err(err) => {
                warn!(%err, "failed to read save record");
                return false;
            }
        };
        let restored = SaveRecord::from_json(&text)
            .and_then(|record| self.game.restore(&record, now_ms));
        if let Err(err) = restored {
            warn!(%err, "saved game rejected");
            return false;
        }

        self.pending_high_score = None;
        log_audio(self.audio.start_music(), "start music");
        true
    }

    /// Record the pending score under `name` and persist the table.
    ///
    /// Returns the 0-based rank, or `None` when nothing was pending or the
    /// name was blank. A blank name keeps the score pending.
    pub fn submit_high_score(&mut self, name: &str, timestamp: u64) -> Option<usize> {
        let score = self.pending_high_score?;
        let rank = self.high_scores.record(name, score, timestamp)?;
        self.pending_high_score = None;
        info!(score, rank, "high score recorded");
        self.persist_high_scores();
        Some(rank)
    }

    /// Drop the pending score without recording it
    pub fn dismiss_high_score(&mut self) {
        self.pending_high_score = None;
    }

    fn persist_high_scores(&mut self) {
        let text = match self.high_scores.to_json() {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "failed to encode high scores");
                return;
            }
        };
        if let Err(err) = self.store.set(HIGH_SCORES_KEY, &text) {
            warn!(%err, "failed to persist high scores");
        }
    }

    /// Forward drained simulation events to the audio sink
    fn after_step(&mut self) {
        for event in self.game.take_events() {
            match event {
                GameEvent::Rotated => log_audio(self.audio.play(SoundCue::Rotate), "rotate cue"),
                GameEvent::Dropped => log_audio(self.audio.play(SoundCue::Drop), "drop cue"),
                GameEvent::LinesCleared(_) => {
                    log_audio(self.audio.play(SoundCue::Clear), "clear cue")
                }
                GameEvent::GameOver { final_score } => {
                    log_audio(self.audio.stop_music(), "stop music");
                    log_audio(self.audio.play(SoundCue::GameOver), "game over cue");
                    if self.high_scores.qualifies(final_score) {
                        self.pending_high_score = Some(final_score);
                    }
                }
            }
        }
    }
}

fn load_high_scores<S: KeyValueStore>(store: &S) -> HighScoreTable {
    match store.get(HIGH_SCORES_KEY) {
        Ok(Some(text)) => HighScoreTable::from_json(&text).unwrap_or_else(|err| {
            warn!(%err, "ignoring malformed high-score table");
            HighScoreTable::new()
        }),
        Ok(None) => HighScoreTable::new(),
        Err(err) => {
            warn!(%err, "failed to read high-score table");
            HighScoreTable::new()
        }
    }
}

fn log_audio(result: Result<(), AudioError>, what: &str) {
    if let Err(err) = result {
        warn!(%err, what, "audio failure ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::piece::Piece;
    use crate::store::MemoryStore;
    use crate::types::{PieceColor, PieceKind, BOARD_WIDTH};

    /// Records every call so tests can check the cue sequence
    #[derive(Debug, Default)]
    struct RecordingAudio {
        calls: Vec<String>,
        muted: bool,
        fail: bool,
    }

    impl RecordingAudio {
        fn log(&mut self, call: &str) -> Result<(), AudioError> {
            self.calls.push(call.to_string());
            if self.fail {
                Err(AudioError::Unavailable("no device".into()))
            } else {
                Ok(())
            }
        }
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            self.log(cue.as_str())
        }

        fn start_music(&mut self) -> Result<(), AudioError> {
            self.log("music:start")
        }

        fn stop_music(&mut self) -> Result<(), AudioError> {
            self.log("music:stop")
        }

        fn set_muted(&mut self, muted: bool) -> Result<(), AudioError> {
            self.muted = muted;
            self.log("mute")
        }

        fn is_muted(&self) -> bool {
            self.muted
        }
    }

    /// Store whose writes always fail
    #[derive(Debug, Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
    }

    fn session() -> Session<MemoryStore, RecordingAudio> {
        let mut s = Session::new(42, MemoryStore::new(), RecordingAudio::default());
        s.start(0);
        s
    }

    /// Fill the top rows so the next spawn collides
    fn force_game_over<S: KeyValueStore, A: AudioSink>(s: &mut Session<S, A>, score: u32) {
        let mut record = s.game().to_record().unwrap();
        record.score = score;
        for row in record.board_grid.iter_mut().skip(2).take(2) {
            for cell in row.iter_mut().skip(1) {
                *cell = Some(PieceColor::Red);
            }
        }
        record.current_piece = Piece::new(PieceKind::O).to_record();
        s.game_mut().restore(&record, 0).unwrap();
        s.apply(GameAction::HardDrop, 0);
    }

    #[test]
    fn test_actions_map_to_game() {
        let mut s = session();
        let col = s.game().current().unwrap().col;
        assert!(s.apply(GameAction::MoveLeft, 0));
        assert_eq!(s.game().current().unwrap().col, col - 1);
        assert!(s.apply(GameAction::MoveRight, 0));
        assert_eq!(s.game().current().unwrap().col, col);
        assert!(s.apply(GameAction::SoftDrop, 250));
        assert_eq!(s.game().current().unwrap().row, 1);
        assert_eq!(s.game().last_fall_ms(), 250);
    }

    #[test]
    fn test_events_become_cues() {
        let mut s = session();
        s.audio.calls.clear();
        assert!(s.apply(GameAction::HardDrop, 0));
        assert_eq!(s.audio().calls, vec!["drop"]);
    }

    #[test]
    fn test_pause_stops_and_resumes_music() {
        let mut s = session();
        s.audio.calls.clear();
        assert!(s.apply(GameAction::Pause, 10));
        assert!(s.game().paused());
        assert!(!s.apply(GameAction::MoveLeft, 20));
        assert!(s.apply(GameAction::Pause, 30));
        assert!(s.game().is_running());
        assert_eq!(s.audio().calls, vec!["music:stop", "music:start"]);
    }

    #[test]
    fn test_toggle_mute() {
        let mut s = session();
        assert!(!s.audio().is_muted());
        assert!(s.apply(GameAction::ToggleMute, 0));
        assert!(s.audio().is_muted());
        s.apply(GameAction::ToggleMute, 0);
        assert!(!s.audio().is_muted());
    }

    #[test]
    fn test_audio_failure_is_ignored() {
        let audio = RecordingAudio {
            fail: true,
            ..Default::default()
        };
        let mut s = Session::new(1, MemoryStore::new(), audio);
        s.start(0);
        assert!(s.apply(GameAction::HardDrop, 0));
        assert!(s.game().is_running());
    }

    #[test]
    fn test_save_and_load_restore_game() {
        let mut s = session();
        s.apply(GameAction::MoveLeft, 0);
        s.apply(GameAction::SoftDrop, 0);
        assert!(s.apply(GameAction::Save, 0));
        let saved = s.snapshot();

        s.apply(GameAction::HardDrop, 0);
        s.apply(GameAction::HardDrop, 0);
        assert_ne!(s.snapshot(), saved);

        assert!(s.apply(GameAction::Load, 500));
        assert_eq!(s.snapshot().board, saved.board);
        assert_eq!(s.snapshot().current, saved.current);
        assert_eq!(s.snapshot().next, saved.next);
        assert_eq!(s.game().last_fall_ms(), 500);
    }

    #[test]
    fn test_load_without_record_is_noop() {
        let mut s = session();
        let before = s.snapshot();
        assert!(!s.apply(GameAction::Load, 0));
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_malformed_record_leaves_game() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{\"boardGrid\": 7}").unwrap();
        let mut s = Session::new(3, store, RecordingAudio::default());
        s.start(0);
        let before = s.snapshot();
        assert!(!s.load(0));
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_save_refused_after_game_over() {
        let mut s = session();
        force_game_over(&mut s, 0);
        assert!(s.game().game_over());
        assert!(!s.apply(GameAction::Save, 0));
        assert_eq!(s.store().get(SAVE_KEY).unwrap(), None);
    }

    #[test]
    fn test_save_write_failure_reports_false() {
        let mut s = Session::new(5, ReadOnlyStore::default(), RecordingAudio::default());
        s.start(0);
        assert!(!s.save());
        assert!(s.game().is_running());
    }

    #[test]
    fn test_game_over_offers_high_score() {
        let mut s = session();
        force_game_over(&mut s, 1500);
        assert!(s.game().game_over());
        assert_eq!(s.pending_high_score(), Some(1500));
        assert!(s.audio().calls.ends_with(&["music:stop".into(), "gameover".into()]));

        assert_eq!(s.submit_high_score("   ", 1), None);
        assert_eq!(s.pending_high_score(), Some(1500));
        assert_eq!(s.submit_high_score("ada", 1), Some(0));
        assert_eq!(s.pending_high_score(), None);

        let stored = s.store().get(HIGH_SCORES_KEY).unwrap().unwrap();
        let table = HighScoreTable::from_json(&stored).unwrap();
        assert_eq!(table.entries()[0].name, "ada");
        assert_eq!(table.entries()[0].score, 1500);
    }

    #[test]
    fn test_zero_score_is_not_offered() {
        let mut s = session();
        force_game_over(&mut s, 0);
        assert!(s.game().game_over());
        assert_eq!(s.pending_high_score(), None);
    }

    #[test]
    fn test_restart_clears_pending_entry() {
        let mut s = session();
        force_game_over(&mut s, 900);
        assert!(s.pending_high_score().is_some());
        assert!(s.apply(GameAction::Restart, 0));
        assert!(s.game().is_running());
        assert_eq!(s.pending_high_score(), None);
    }

    #[test]
    fn test_high_scores_load_on_new() {
        let mut store = MemoryStore::new();
        let mut table = HighScoreTable::new();
        table.record("bo", 700, 1);
        store.set(HIGH_SCORES_KEY, &table.to_json().unwrap()).unwrap();

        let s = Session::new(1, store, RecordingAudio::default());
        assert_eq!(s.high_scores(), &table);

        let mut store = MemoryStore::new();
        store.set(HIGH_SCORES_KEY, "not json").unwrap();
        let s = Session::new(1, store, RecordingAudio::default());
        assert!(s.high_scores().is_empty());
    }

    #[test]
    fn test_line_clear_plays_clear_cue() {
        let mut s = session();
        let mut record = s.game().to_record().unwrap();
        for x in 1..BOARD_WIDTH as usize {
            record.board_grid[19][x] = Some(PieceColor::Green);
        }
        let mut bar = Piece::new(PieceKind::I);
        bar.rotate();
        bar.col = 0;
        record.current_piece = bar.to_record();
        s.game_mut().restore(&record, 0).unwrap();
        s.audio.calls.clear();

        s.apply(GameAction::HardDrop, 0);
        assert_eq!(s.audio().calls, vec!["drop", "clear"]);
        assert_eq!(s.game().score(), 100);
    }
}
