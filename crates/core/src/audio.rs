//! Audio collaborator interface
//!
//! The session forwards discrete cues and background-music signals here. Any
//! error is logged by the caller and otherwise ignored.

use crate::error::AudioError;
use crate::types::SoundCue;

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;

    fn start_music(&mut self) -> Result<(), AudioError>;

    fn stop_music(&mut self) -> Result<(), AudioError>;

    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError>;

    fn is_muted(&self) -> bool;
}

/// Sink that only tracks the mute flag
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio {
    muted: bool,
}

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }

    fn start_music(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
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
