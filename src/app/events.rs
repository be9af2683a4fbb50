//! Outbound application events.
//!
//! The [`AedController`](super::service::AedController) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to the console, feed a session
//! recorder, drive an instructor dashboard, etc.

use crate::error::{Fault, Interlock};
use crate::fsm::DeviceState;
use crate::rhythm::{RhythmClassification, RhythmPath};

/// Structured events emitted by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Power-on preconditions held; the device is on.
    PoweredOn { battery: u8 },

    /// Power-on refused (no charge or no battery seated).
    PowerOnRefused,

    /// The state machine moved.
    StateChanged { from: DeviceState, to: DeviceState },

    /// A step failed or refused to run.
    FaultDetected(Fault),

    /// A safety interlock opened (`open = true`) or closed again.
    InterlockChanged { interlock: Interlock, open: bool },

    /// Battery level accepted a new value.
    BatteryChanged(u8),

    /// A shock was delivered.
    ShockDelivered { count: u32, battery: u8 },

    /// A rhythm was assessed.
    RhythmAssessed {
        rhythm: RhythmClassification,
        path: RhythmPath,
    },

    /// CPR depth coaching was given.
    CprCoached(CprFeedback),

    /// Full reset completed.
    ShutDown(ShutdownReason),
}

/// Why the device reset itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Battery reached zero.
    BatteryDepleted,
    /// Power button held while on.
    PowerButton,
    /// Explicit request from the host.
    Requested,
}

/// CPR depth coaching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CprFeedback {
    PushHarder,
    PushGently,
    MaintainDepth,
}
