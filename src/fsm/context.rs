//! Shared mutable context threaded through every controller step.
//!
//! `DeviceContext` is the single owner of everything the procedure
//! mutates: battery, shock counter, power and electrode flags, the state
//! machine and the drain scheduler.  Both the shock path and the periodic
//! drain reach the battery through here, one caller at a time.  Think of
//! it as the "blackboard" the steps read from and write to.

use core::time::Duration;

use log::{error, info, warn};

use crate::app::events::{AppEvent, ShutdownReason};
use crate::app::ports::{DevicePorts, PadType};
use crate::battery::{BatteryModel, FULL_CHARGE};
use crate::config::DeviceConfig;
use crate::error::{Fault, Result};
use crate::prompts;
use crate::rhythm::RhythmAnalyzer;
use crate::safety::CancelToken;
use crate::scheduler::{FiredSchedules, Schedule, Scheduler};

use super::{DeviceState, StateMachine};

/// Label of the periodic battery-drain schedule.
pub const DRAIN_SCHEDULE: &str = "battery-drain";

// ---------------------------------------------------------------------------
// Electrode
// ---------------------------------------------------------------------------

/// Pads on the patient.  The pad type is for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElectrodeConnection {
    pub connected: bool,
    pub pad: Option<PadType>,
}

// ---------------------------------------------------------------------------
// DeviceContext
// ---------------------------------------------------------------------------

pub struct DeviceContext {
    // -- Device state --
    pub battery: BatteryModel,
    pub shock_count: u32,
    pub powered: bool,
    pub electrode: ElectrodeConnection,
    /// Pad placement has been prompted; attaching now starts analysis.
    pub pads_enabled: bool,
    /// The shock sequence enabled the shock button.
    pub shock_armed: bool,
    pub analyzer: RhythmAnalyzer,

    // -- Timing --
    pub fsm: StateMachine,
    /// Simulated seconds since power-on.  Also the FSM's clock.
    pub elapsed_secs: u64,
    scheduler: Scheduler,

    // -- Configuration --
    pub config: DeviceConfig,

    // -- Cancellation / diagnostics --
    pub cancel: CancelToken,
    pub last_fault: Option<Fault>,
    pub last_shutdown: Option<ShutdownReason>,
}

impl DeviceContext {
    /// Create a powered-off context with the given configuration.
    pub fn new(config: DeviceConfig) -> Self {
        let mut scheduler = Scheduler::new();
        // Stopped until power-on; drain only runs while powered.
        let drain = Schedule {
            label: DRAIN_SCHEDULE,
            interval_secs: config.drain_interval_secs,
        };
        if scheduler.add(drain).is_none() {
            error!("battery drain schedule not registered");
        }

        Self {
            battery: BatteryModel::new(
                config.min_operating_battery_percent,
                config.shock_cost_percent,
            ),
            shock_count: 0,
            powered: false,
            electrode: ElectrodeConnection::default(),
            pads_enabled: false,
            shock_armed: false,
            analyzer: RhythmAnalyzer::new(),
            fsm: StateMachine::new(),
            elapsed_secs: 0,
            scheduler,
            config,
            cancel: CancelToken::new(),
            last_fault: None,
            last_shutdown: None,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.fsm.current()
    }

    /// Mark the device powered and start the drain timer.
    pub fn power_on(&mut self) {
        self.powered = true;
        self.elapsed_secs = 0;
        self.cancel.clear();
        self.last_shutdown = None;
        self.scheduler.restart();
        self.scheduler.set_enabled(true);
    }

    /// Transition the state machine and announce it.
    pub fn enter(&mut self, next: DeviceState, hw: &mut impl DevicePorts) -> Result<()> {
        let from = self.fsm.transition(next)?;
        hw.emit(&AppEvent::StateChanged { from, to: next });
        Ok(())
    }

    /// Latch `fault` as the most recent failure and report it.
    pub fn record_fault(&mut self, fault: Fault, hw: &mut impl DevicePorts) {
        warn!("step failed: {fault}");
        self.last_fault = Some(fault);
        hw.emit(&AppEvent::FaultDetected(fault));
    }

    // ── Battery ──────────────────────────────────────────────────

    /// Manual level entry.  Returns whether the value was accepted.
    pub fn set_battery_level(&mut self, level: i32, hw: &mut impl DevicePorts) -> bool {
        match self.battery.set_level(level) {
            Some(l) => {
                notify_battery(hw, l);
                true
            }
            None => false,
        }
    }

    /// Take the cost of one shock and publish the new level.
    pub fn consume_shock(&mut self, hw: &mut impl DevicePorts) -> Result<u8> {
        let level = self.battery.consume_shock()?;
        notify_battery(hw, level);
        Ok(level)
    }

    // ── Cooperative wait ─────────────────────────────────────────

    /// Hold for `secs` simulated seconds.
    ///
    /// One `ClockPort::sleep` per second; between sleeps the elapsed
    /// counter and the drain timer advance.  Returns early with an error
    /// if the device is off, a power-off was requested (the device is then
    /// shut down), or the battery hit zero (likewise).
    pub fn wait(&mut self, secs: u32, hw: &mut impl DevicePorts) -> Result<()> {
        self.check_interrupted(hw)?;
        for _ in 0..secs {
            hw.sleep(Duration::from_secs(1));
            self.elapsed_secs += 1;
            hw.update_elapsed_time(self.elapsed_secs);

            let mut fired = FiredSchedules::default();
            self.scheduler.tick(1, &mut fired);
            for _ in 0..fired.count(DRAIN_SCHEDULE) {
                if let Some(level) = self.battery.drain_one_unit() {
                    notify_battery(hw, level);
                }
            }

            self.check_interrupted(hw)?;
        }
        Ok(())
    }

    fn check_interrupted(&mut self, hw: &mut impl DevicePorts) -> Result<()> {
        if !self.powered {
            return Err(Fault::PoweredOff);
        }
        if self.cancel.is_requested() {
            self.shut_down(ShutdownReason::PowerButton, hw);
            return Err(Fault::PoweredOff);
        }
        if self.battery.is_depleted() {
            self.shut_down(ShutdownReason::BatteryDepleted, hw);
            return Err(Fault::BatteryDepleted);
        }
        Ok(())
    }

    // ── Shutdown ─────────────────────────────────────────────────

    /// Full reset to factory defaults.  The instance survives.
    pub fn shut_down(&mut self, reason: ShutdownReason, hw: &mut impl DevicePorts) {
        match reason {
            ShutdownReason::BatteryDepleted => {
                warn!("battery depleted, shutting down");
                hw.inform_user(prompts::BATTERY_DRAINED);
            }
            _ => {
                info!("shutting down ({reason:?})");
                hw.inform_user(prompts::POWERING_OFF);
            }
        }

        // (_, ShuttingDown) and (ShuttingDown, Off) are always legal.
        if let Err(e) = self.enter(DeviceState::ShuttingDown, hw) {
            warn!("shutdown transition rejected: {e}");
        }
        if let Err(e) = self.enter(DeviceState::Off, hw) {
            warn!("shutdown transition rejected: {e}");
        }

        self.battery.reset();
        self.shock_count = 0;
        self.powered = false;
        self.electrode = ElectrodeConnection::default();
        self.pads_enabled = false;
        self.shock_armed = false;
        self.analyzer.reset();
        self.elapsed_secs = 0;
        self.scheduler.set_enabled(false);
        self.scheduler.restart();
        self.cancel.clear();
        self.last_shutdown = Some(reason);

        hw.reset_ui();
        hw.update_battery_level(FULL_CHARGE);
        hw.emit(&AppEvent::ShutDown(reason));
    }
}

fn notify_battery(hw: &mut impl DevicePorts, level: u8) {
    hw.update_battery_level(level);
    hw.emit(&AppEvent::BatteryChanged(level));
}
