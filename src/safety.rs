//! Safety monitor.
//!
//! Every unsafe step calls [`SafetyMonitor::guard`] before it proceeds.
//! The guard latches interlocks in a bitmask so set/clear edges are logged
//! once each, and holds the procedure while the pads or the battery pack
//! are disconnected.
//!
//! ## Guard sequence
//!
//! 1. Device must be powered.
//! 2. While the electrode query is false: overlay shows "no electrode",
//!    advise, wait one poll interval, re-check.
//! 3. Same for the battery-connected query.
//! 4. Battery at zero: full shutdown, guard fails.
//!
//! Each wait in steps 2-3 goes through `DeviceContext::wait`, so a
//! power-off request or a drained battery ends the loop.  The number of
//! re-checks per interlock is bounded by `max_connection_polls`; running
//! out fails the guard with `ConnectionLost` and leaves the device on.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};

use crate::app::events::{AppEvent, ShutdownReason};
use crate::app::ports::DevicePorts;
use crate::error::{Fault, Interlock, Result};
use crate::fsm::context::DeviceContext;
use crate::prompts;

// ───────────────────────────────────────────────────────────────
// Cancellation
// ───────────────────────────────────────────────────────────────

/// Power-off request shared with whoever drives the controller (panel
/// thread, scenario runner, tests).  Checked once per simulated second.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

// ───────────────────────────────────────────────────────────────
// SafetyMonitor
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SafetyMonitor {
    /// Latched interlock bitmask.
    interlocks: u8,
}

impl SafetyMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate for unsafe steps.  On failure the fault is recorded on the
    /// context.
    pub fn guard(&mut self, ctx: &mut DeviceContext, hw: &mut impl DevicePorts) -> bool {
        match self.check(ctx, hw) {
            Ok(()) => true,
            Err(fault) => {
                ctx.record_fault(fault, hw);
                false
            }
        }
    }

    /// [`guard`](Self::guard) without recording; for steps that chain with `?`.
    pub fn check(&mut self, ctx: &mut DeviceContext, hw: &mut impl DevicePorts) -> Result<()> {
        if !ctx.powered {
            return Err(Fault::PoweredOff);
        }

        self.await_closed(Interlock::ElectrodeDisconnected, ctx, hw)?;
        self.await_closed(Interlock::BatteryDisconnected, ctx, hw)?;

        let depleted = ctx.battery.is_depleted();
        self.latch(Interlock::BatteryDepleted, depleted, hw);
        if depleted {
            ctx.shut_down(ShutdownReason::BatteryDepleted, hw);
            return Err(Fault::BatteryDepleted);
        }
        Ok(())
    }

    /// Current interlock bitmask.
    pub fn interlocks(&self) -> u8 {
        self.interlocks
    }

    // ── Internal ──────────────────────────────────────────────────

    fn await_closed(
        &mut self,
        interlock: Interlock,
        ctx: &mut DeviceContext,
        hw: &mut impl DevicePorts,
    ) -> Result<()> {
        let mut polls = 0u32;
        loop {
            let open = match interlock {
                Interlock::ElectrodeDisconnected => !hw.electrode_connected(),
                Interlock::BatteryDisconnected => !hw.battery_connected(),
                Interlock::BatteryDepleted => ctx.battery.is_depleted(),
            };
            self.latch(interlock, open, hw);

            if !open {
                if polls > 0 && interlock == Interlock::ElectrodeDisconnected {
                    hw.set_device_overlay_style(true);
                }
                return Ok(());
            }

            if polls >= ctx.config.max_connection_polls {
                error!("{interlock} unresolved after {polls} polls, giving up");
                return Err(Fault::from(interlock));
            }

            match interlock {
                Interlock::ElectrodeDisconnected => {
                    hw.set_device_overlay_style(false);
                    hw.inform_user(prompts::CONNECT_ELECTRODE);
                }
                _ => hw.inform_user(prompts::CONNECT_BATTERY),
            }
            polls += 1;

            if let Err(e) = ctx.wait(ctx.config.connection_poll_secs, hw) {
                warn!("guard interrupted while waiting on {interlock}: {e}");
                return Err(e);
            }
        }
    }

    /// Set or clear an interlock bit, logging and emitting on edges.
    fn latch(&mut self, interlock: Interlock, open: bool, hw: &mut impl DevicePorts) {
        let was_open = self.interlocks & interlock.mask() != 0;
        if open == was_open {
            return;
        }
        if open {
            error!("SAFETY INTERLOCK SET: {interlock}");
            self.interlocks |= interlock.mask();
        } else {
            info!("SAFETY INTERLOCK CLEARED: {interlock}");
            self.interlocks &= !interlock.mask();
        }
        hw.emit(&AppEvent::InterlockChanged { interlock, open });
    }
}
