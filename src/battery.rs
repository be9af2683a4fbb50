//! Battery charge model.
//!
//! Single authority for the charge percentage: range clamping, the
//! periodic one-percent drain, and the cost of a shock all live here so
//! the invariant (`0..=100`) is enforced in exactly one place.

use log::{debug, info, warn};

use crate::error::Fault;

/// Full charge, and the level restored by a device reset.
pub const FULL_CHARGE: u8 = 100;

/// Battery charge percentage, always within `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryModel {
    level: u8,
    /// Minimum level required for self-test and shocks.
    min_operating: u8,
    /// Charge consumed per shock.
    shock_cost: u8,
}

impl BatteryModel {
    pub fn new(min_operating: u8, shock_cost: u8) -> Self {
        Self {
            level: FULL_CHARGE,
            min_operating,
            shock_cost,
        }
    }

    /// Current charge in percent.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Replace the level.  Values outside `0..=100` are ignored.
    ///
    /// Returns the new level when it was accepted so the caller can notify
    /// observers; `None` means nothing changed.
    pub fn set_level(&mut self, level: i32) -> Option<u8> {
        match u8::try_from(level) {
            Ok(l) if l <= FULL_CHARGE => {
                self.level = l;
                debug!("battery level set to {l}%");
                Some(l)
            }
            _ => {
                warn!("battery level {level}% rejected (must be 0..=100)");
                None
            }
        }
    }

    /// One periodic drain tick: decrement by one unless already empty.
    pub fn drain_one_unit(&mut self) -> Option<u8> {
        if self.level == 0 {
            return None;
        }
        self.set_level(i32::from(self.level) - 1)
    }

    /// Whether the level meets the operating minimum.
    pub fn is_operational(&self) -> bool {
        self.level >= self.min_operating
    }

    pub fn is_depleted(&self) -> bool {
        self.level == 0
    }

    /// Take the cost of one shock, floored at zero.
    ///
    /// Fails without touching the level when the battery is below the
    /// operating minimum.
    pub fn consume_shock(&mut self) -> Result<u8, Fault> {
        if !self.is_operational() {
            warn!(
                "shock refused: battery {}% below {}%",
                self.level, self.min_operating
            );
            return Err(Fault::InsufficientBattery);
        }
        self.level = self.level.saturating_sub(self.shock_cost);
        info!("shock drew {}%, battery now {}%", self.shock_cost, self.level);
        Ok(self.level)
    }

    /// Back to full charge (device reset).
    pub fn reset(&mut self) {
        self.level = FULL_CHARGE;
    }
}
