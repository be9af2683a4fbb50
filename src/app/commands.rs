//! Inbound commands to the controller.
//!
//! These represent actions taken on the training panel (buttons, pads,
//! rhythm selector, battery entry) that the
//! [`AedController`](super::service::AedController) interprets and acts
//! upon.

use crate::app::ports::PadType;
use crate::rhythm::RhythmClassification;

/// Commands that the panel or a scenario can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Power button held past the hold threshold.
    PowerButtonHeld,

    /// Pads placed on the patient.
    AttachPads(PadType),

    /// Pads removed.
    DetachPads,

    /// Trainer picked the rhythm to present.
    SelectRhythm(RhythmClassification),

    /// Analyze using the input query and the rhythm-detection step.
    AutoAnalyze,

    /// Shock button pressed.
    DeliverShock,

    /// CPR button pressed with the given compression depth (0..=100).
    PerformCpr { depth: u8 },

    /// CPR button pressed a second time; back to analysis.
    FinishCpr,

    /// Manual battery level entry.  Out-of-range values are ignored.
    SetBatteryLevel(i32),

    /// Let simulated time pass with nothing else happening.
    Idle { secs: u32 },

    /// Unconditional reset.
    ShutDown,
}
