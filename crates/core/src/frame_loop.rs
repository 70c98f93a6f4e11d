//! Frame scheduling for the terminal driver

/// What the driver should do after drawing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStep {
    Continue,
    Stop,
}

/// Frame scheduling gate.
///
/// The driver ticks the session, renders, then asks `after_frame` whether to
/// schedule another frame. Once a game-over frame has been drawn the loop
/// stops; a paused game keeps being drawn so the overlay stays up. Call
/// `rearm` after a restart or load to resume scheduling.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    stopped: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after_frame(&mut self, game_over: bool) -> LoopStep {
        if self.stopped {
            return LoopStep::Stop;
        }
        self.frames += 1;
        if game_over {
            self.stopped = true;
            return LoopStep::Stop;
        }
        LoopStep::Continue
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn rearm(&mut self) {
        self.stopped = false;
    }

    /// Frames drawn since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
