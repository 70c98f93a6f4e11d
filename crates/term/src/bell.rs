//! Terminal bell audio sink.
//!
//! Terminals have no music channel, so background music is only tracked as a
//! flag (the HUD can show it). Line clears and game over ring the bell; the
//! frequent rotate/drop cues stay silent.

use std::io::{self, Write};

use crate::core::{AudioError, AudioSink};
use crate::types::SoundCue;

const BEL: &[u8] = b"\x07";

pub struct BellAudio<W: Write = io::Stdout> {
    out: W,
    muted: bool,
    music_playing: bool,
}

impl BellAudio<io::Stdout> {
    pub fn stdout(muted: bool) -> Self {
        Self::new(io::stdout(), muted)
    }
}

impl<W: Write> BellAudio<W> {
    pub fn new(out: W, muted: bool) -> Self {
        Self {
            out,
            muted,
            music_playing: false,
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for BellAudio<W> {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        if self.muted || !matches!(cue, SoundCue::Clear | SoundCue::GameOver) {
            return Ok(());
        }
        self.out.write_all(BEL)?;
        self.out.flush()?;
        Ok(())
    }

    fn start_music(&mut self) -> Result<(), AudioError> {
        self.music_playing = true;
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        self.music_playing = false;
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError> {
        self.muted = muted;
        Ok(())
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}
