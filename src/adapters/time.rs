//! Host clock adapter.
//!
//! Implements [`ClockPort`] by sleeping the calling thread.  One simulated
//! second lasts `ms_per_sim_sec` wall-clock milliseconds: `1000` runs the
//! trainer in real time, `0` runs it as fast as possible (tests, batch
//! scenario runs).

use std::time::Duration;

use crate::app::ports::ClockPort;

pub struct ScaledClock {
    ms_per_sim_sec: u64,
    /// Simulated time handed out so far.
    simulated: Duration,
}

impl Default for ScaledClock {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ScaledClock {
    pub fn new(ms_per_sim_sec: u64) -> Self {
        Self {
            ms_per_sim_sec,
            simulated: Duration::ZERO,
        }
    }

    /// No wall-clock delay at all.
    pub fn instant() -> Self {
        Self::new(0)
    }

    /// Simulated time slept through this clock.
    pub fn simulated(&self) -> Duration {
        self.simulated
    }
}

impl ClockPort for ScaledClock {
    fn sleep(&mut self, duration: Duration) {
        self.simulated += duration;
        if self.ms_per_sim_sec == 0 {
            return;
        }
        let wall_ms = duration.as_millis() as u64 * self.ms_per_sim_sec / 1000;
        std::thread::sleep(Duration::from_millis(wall_ms));
    }
}
