//! Periodic timer table.
//!
//! The controller ticks the scheduler once per simulated second from inside
//! its cooperative waits, so periodic work (battery drain) keeps running
//! while a step holds an advisory on screen.  Fires go to a
//! [`SchedulerDelegate`]; the scheduler knows nothing about batteries.
//!
//! ```text
//!  DeviceContext::wait()
//!        │ tick(1)
//!        ▼
//!  ┌──────────────┐  on_schedule_fired(label)  ┌────────────────┐
//!  │  Scheduler   │ ─────────────────────────▶ │ FiredSchedules │
//!  └──────────────┘                            └────────────────┘
//! ```

use crate::app::ports::SchedulerDelegate;
use log::{debug, info, warn};

/// Maximum number of timers (stack-allocated).
pub const MAX_SCHEDULES: usize = 4;

/// A periodic timer.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Label reported to the delegate (e.g., "battery-drain").
    pub label: &'static str,
    /// Fire every `interval_secs` seconds.  Zero never fires.
    pub interval_secs: u32,
}

#[derive(Debug, Clone)]
struct Timer {
    schedule: Schedule,
    /// Seconds since the last fire.
    elapsed_secs: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timers: heapless::Vec<Timer, MAX_SCHEDULES>,
    /// Global run flag; a stopped scheduler ignores ticks.
    enabled: bool,
}

impl Scheduler {
    /// An empty, stopped scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer.  Returns its slot, or `None` when the table is full.
    pub fn add(&mut self, schedule: Schedule) -> Option<usize> {
        let (label, interval_secs) = (schedule.label, schedule.interval_secs);
        let timer = Timer {
            schedule,
            elapsed_secs: 0,
        };
        if self.timers.push(timer).is_err() {
            warn!("Scheduler: table full, '{label}' not added");
            return None;
        }
        let slot = self.timers.len() - 1;
        info!("Scheduler: '{label}' every {interval_secs}s at slot {slot}");
        Some(slot)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Restart every countdown from zero.
    pub fn restart(&mut self) {
        for timer in &mut self.timers {
            timer.elapsed_secs = 0;
        }
    }

    /// Advance every timer by `secs`.  A timer whose interval fits into the
    /// accumulated time several times fires that many times; the remainder
    /// carries over.
    pub fn tick(&mut self, secs: u32, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }
        for timer in &mut self.timers {
            let interval = timer.schedule.interval_secs;
            if interval == 0 {
                continue;
            }
            timer.elapsed_secs = timer.elapsed_secs.saturating_add(secs);
            while timer.elapsed_secs >= interval {
                debug!("Scheduler: '{}' fired", timer.schedule.label);
                delegate.on_schedule_fired(timer.schedule.label);
                timer.elapsed_secs -= interval;
            }
        }
    }
}

/// Delegate that tallies fires per label for the caller to act on.
#[derive(Debug, Default)]
pub struct FiredSchedules {
    fires: heapless::Vec<(&'static str, u32), MAX_SCHEDULES>,
}

impl FiredSchedules {
    /// How many times `label` fired.
    pub fn count(&self, label: &str) -> u32 {
        self.fires
            .iter()
            .find(|(l, _)| *l == label)
            .map_or(0, |(_, n)| *n)
    }

    pub fn is_empty(&self) -> bool {
        self.fires.is_empty()
    }
}

impl SchedulerDelegate for FiredSchedules {
    fn on_schedule_fired(&mut self, label: &'static str) {
        if let Some((_, n)) = self.fires.iter_mut().find(|(l, _)| *l == label) {
            *n += 1;
            return;
        }
        // At most one entry per timer, so the push cannot overflow.
        let _ = self.fires.push((label, 1));
    }
}
