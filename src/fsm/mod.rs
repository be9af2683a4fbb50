//! Device state machine.
//!
//! The controller runs a scripted procedure, so states are entered by the
//! step that owns them rather than by a per-tick update handler.  This
//! module owns the legal edges and rejects anything else.
//!
//! ```text
//!  OFF ──[run]──▶ SELF_TEST ──[pass]──▶ READY ──▶ RESPONSIVENESS
//!                    │                    │              │
//!                 [fail: halt,        [pads already      ▼
//!                  stay powered]       attached]     CALL_FOR_HELP
//!                                         │              │
//!                                         │              ▼
//!                                         │      ELECTRODE_PLACEMENT
//!                                         ▼              │
//!                  ┌─────────────────▶ ANALYZING ◀───────┘
//!                  │                   │      │
//!                  │            [shockable]  [PEA]      [asystole / regular:
//!                  │                   ▼      │          stay, powered]
//!                  │             SHOCK_ADVISED│
//!                  │                   ▼      │
//!                  │           SHOCK_DELIVERED│
//!                  │                   ▼      ▼
//!                  └──────────────────── CPR
//!
//!  Any state ──[depletion / power off]──▶ SHUTTING_DOWN ──▶ OFF
//! ```

pub mod context;

use core::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Fault;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Every state the device can be in.  Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceState {
    Off = 0,
    SelfTest = 1,
    Ready = 2,
    Responsiveness = 3,
    CallForHelp = 4,
    ElectrodePlacement = 5,
    Analyzing = 6,
    ShockAdvised = 7,
    ShockDelivered = 8,
    Cpr = 9,
    ShuttingDown = 10,
}

impl DeviceState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::SelfTest => "SelfTest",
            Self::Ready => "Ready",
            Self::Responsiveness => "Responsiveness",
            Self::CallForHelp => "CallForHelp",
            Self::ElectrodePlacement => "ElectrodePlacement",
            Self::Analyzing => "Analyzing",
            Self::ShockAdvised => "ShockAdvised",
            Self::ShockDelivered => "ShockDelivered",
            Self::Cpr => "Cpr",
            Self::ShuttingDown => "ShuttingDown",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: Self) -> bool {
        use DeviceState::*;
        matches!(
            (self, next),
            (_, ShuttingDown)
                | (ShuttingDown, Off)
                | (Off, SelfTest)
                | (SelfTest, Ready)
                | (Ready, Responsiveness)
                | (Ready, Analyzing)
                | (Responsiveness, CallForHelp)
                | (CallForHelp, ElectrodePlacement)
                | (ElectrodePlacement, Analyzing)
                | (Analyzing, ShockAdvised)
                | (Analyzing, Cpr)
                | (ShockAdvised, ShockDelivered)
                | (ShockDelivered, Cpr)
                | (Cpr, Analyzing)
        )
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// State tracker
// ---------------------------------------------------------------------------

/// Tracks the active state.
#[derive(Debug, Clone)]
pub struct StateMachine {
    current: DeviceState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: DeviceState::Off,
        }
    }

    pub fn current(&self) -> DeviceState {
        self.current
    }

    /// Move to `next` if the edge is legal.  Returns the previous state.
    pub fn transition(&mut self, next: DeviceState) -> Result<DeviceState, Fault> {
        let prev = self.current;
        if !prev.can_transition_to(next) {
            warn!("FSM rejected transition: {prev} -> {next}");
            return Err(Fault::OutOfSequence(prev));
        }
        info!("FSM transition: {prev} -> {next}");
        self.current = next;
        Ok(prev)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
