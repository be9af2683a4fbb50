//! Fault taxonomy for the AED simulator.
//!
//! Every failure in the device is recoverable through user action
//! (reconnecting pads, swapping batteries, cycling power), so nothing in
//! here is ever raised as a panic.  Steps return `Result<_, Fault>`
//! internally; the public controller operations collapse that into the
//! boolean contract and keep the fault around for inspection.
//! All variants are `Copy` so they can be latched and emitted without
//! allocation.

use core::fmt;

use crate::fsm::DeviceState;

// ---------------------------------------------------------------------------
// Controller faults
// ---------------------------------------------------------------------------

/// Why a step refused to run or stopped part-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Battery below the operating minimum (self-test, shock delivery).
    InsufficientBattery,
    /// External diagnostic query failed during self-test.
    DiagnosticFailure,
    /// Rhythm check attempted without pads on the patient.
    ElectrodeNotConnected,
    /// An interlock stayed open until the poll budget ran out.
    ConnectionLost(Interlock),
    /// Battery reached zero; the device was reset.
    BatteryDepleted,
    /// Step attempted while the device is off (or was switched off mid-step).
    PoweredOff,
    /// Shock delivery requested before the shock sequence armed it.
    ShockNotArmed,
    /// Step is not legal from the current state.
    OutOfSequence(DeviceState),
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientBattery => write!(f, "insufficient battery"),
            Self::DiagnosticFailure => write!(f, "self-test diagnostic failed"),
            Self::ElectrodeNotConnected => write!(f, "electrode not connected"),
            Self::ConnectionLost(i) => write!(f, "connection lost: {i}"),
            Self::BatteryDepleted => write!(f, "battery depleted"),
            Self::PoweredOff => write!(f, "device powered off"),
            Self::ShockNotArmed => write!(f, "shock not armed"),
            Self::OutOfSequence(state) => write!(f, "not allowed in state {state}"),
        }
    }
}

impl From<Interlock> for Fault {
    fn from(i: Interlock) -> Self {
        match i {
            Interlock::BatteryDepleted => Self::BatteryDepleted,
            other => Self::ConnectionLost(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Safety interlocks
// ---------------------------------------------------------------------------

/// Interlocks are latched by the safety monitor in a bitfield so that the
/// set/clear edges can be logged individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Interlock {
    /// Pads are not attached to the patient.
    ElectrodeDisconnected = 0b0000_0001,
    /// Battery pack is not seated.
    BatteryDisconnected = 0b0000_0010,
    /// Battery charge is zero.
    BatteryDepleted = 0b0000_0100,
}

impl Interlock {
    /// Return the bitmask for this interlock.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Interlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElectrodeDisconnected => write!(f, "electrode disconnected"),
            Self::BatteryDisconnected => write!(f, "battery disconnected"),
            Self::BatteryDepleted => write!(f, "battery depleted"),
        }
    }
}

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Fault>;
