//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the binary routes that to stderr).  A session
//! recorder or instructor dashboard would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::PoweredOn { battery } => {
                info!("POWER | on, battery={battery}%");
            }
            AppEvent::PowerOnRefused => {
                warn!("POWER | refused");
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {from} -> {to}");
            }
            AppEvent::FaultDetected(fault) => {
                warn!("FAULT | {fault}");
            }
            AppEvent::InterlockChanged { interlock, open } => {
                let edge = if *open { "open" } else { "closed" };
                info!("INTERLOCK | {interlock} {edge}");
            }
            AppEvent::BatteryChanged(level) => {
                info!("BATTERY | {level}%");
            }
            AppEvent::ShockDelivered { count, battery } => {
                info!("SHOCK | #{count} delivered, battery={battery}%");
            }
            AppEvent::RhythmAssessed { rhythm, path } => {
                info!("RHYTHM | {rhythm} -> {path:?}");
            }
            AppEvent::CprCoached(feedback) => {
                info!("CPR | {feedback:?}");
            }
            AppEvent::ShutDown(reason) => {
                info!("POWER | shut down ({reason:?})");
            }
        }
    }
}
