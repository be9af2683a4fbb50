//! Audio cue player.
//!
//! Models a single-source media player.  Playing a cue always clears the
//! source before setting it, so replaying the cue that is already loaded
//! starts it again from position zero instead of being a no-op.

use core::time::Duration;

use log::debug;

use crate::app::ports::{AudioPort, Cue};

#[derive(Debug, Default)]
pub struct CuePlayer {
    source: Option<Cue>,
    position: Duration,
    started: u64,
    restarts: u64,
}

impl CuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cue currently loaded, if any.
    pub fn source(&self) -> Option<Cue> {
        self.source
    }

    /// Playback position within the loaded cue.
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Total playback starts.
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Starts that replayed the cue already loaded.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Advance playback of the loaded cue.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.source.is_some() {
            self.position += elapsed;
        }
    }

    pub fn stop(&mut self) {
        self.source = None;
        self.position = Duration::ZERO;
    }
}

impl AudioPort for CuePlayer {
    fn play_cue(&mut self, cue: Cue) {
        let replay = self.source == Some(cue);
        self.stop();
        self.source = Some(cue);
        self.started += 1;
        if replay {
            self.restarts += 1;
        }
        debug!("audio: {} (replay={replay})", cue.asset());
    }
}
