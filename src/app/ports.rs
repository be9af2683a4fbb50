//! Port traits: the hexagonal boundary between the controller and the trainer UI.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AedController (domain)
//! ```
//!
//! The presentation layer (display, indicator lights, audio, switches on
//! the training panel) implements these traits.  The
//! [`AedController`](super::service::AedController) owns one value that
//! implements all of them ([`DevicePorts`]) and calls it directly; there is
//! no broadcast and no global lookup.
//!
//! ## Contracts
//!
//! - **InputPort** queries are synchronous and side-effect free.
//! - **AudioPort::play_cue** restarts a cue that is already playing.
//! - **ClockPort::sleep** is the only place simulated time passes.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rhythm::RhythmClassification;

// ───────────────────────────────────────────────────────────────
// Presentation vocabulary
// ───────────────────────────────────────────────────────────────

/// The six indicator lights around the device face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Light {
    /// Step 1: check responsiveness.
    Responsiveness = 1,
    /// Step 2: call for help.
    CallForHelp = 2,
    /// Step 3: attach pads.
    AttachPads = 3,
    /// Step 4: do not touch, analyzing.
    Analyzing = 4,
    /// Step 5: CPR.
    Cpr = 5,
    /// Step 6: shock.
    Shock = 6,
}

impl Light {
    /// Lights cycled during self-test (all but the shock light).
    pub const SELF_TEST: [Self; 5] = [
        Self::Responsiveness,
        Self::CallForHelp,
        Self::AttachPads,
        Self::Analyzing,
        Self::Cpr,
    ];

    /// Panel position, 1..=6.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Unit status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Off,
    Ok,
    NotOk,
}

/// Pad type on the patient.  Shown to the user only; no control decision
/// depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadType {
    Adult,
    Child,
}

/// Audio prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    StayCalm,
    CheckResponsiveness,
    CallForHelp,
    AttachPads,
    DoNotTouchPatient,
    ShockAdvised,
    NoShockAdvised,
    ShockDelivering,
    ShockTone,
    ShockDelivered,
    StartCpr,
    StopCpr,
    PushHarder,
    PushGently,
    MaintainDepth,
    ChangeBatteries,
    UnitFailed,
    UnitOk,
}

impl Cue {
    /// Asset name of the recording.
    pub fn asset(self) -> &'static str {
        match self {
            Self::StayCalm => "StayCalm.aiff",
            Self::CheckResponsiveness => "CheckResponsiveness.aiff",
            Self::CallForHelp => "CallForHelp.aiff",
            Self::AttachPads => "DefibPadsToChest.aiff",
            Self::DoNotTouchPatient => "DoNotTouchPatient.aiff",
            Self::ShockAdvised => "ShockAdvised.aiff",
            Self::NoShockAdvised => "NoShockAdvised.aiff",
            Self::ShockDelivering => "ShockDelivering.aiff",
            Self::ShockTone => "ShockTone.aiff",
            Self::ShockDelivered => "ShockDelivered.aiff",
            Self::StartCpr => "StartCPR.aiff",
            Self::StopCpr => "StopCPR.aiff",
            Self::PushHarder => "pushHarder.aiff",
            Self::PushGently => "pushGently.aiff",
            Self::MaintainDepth => "maintainDepth.aiff",
            Self::ChangeBatteries => "ChangeBatteries.aiff",
            Self::UnitFailed => "UnitFailed.aiff",
            Self::UnitOk => "UnitOkay.aiff",
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → screen / lights)
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    /// Main user display text.
    fn inform_user(&mut self, text: &str);

    /// Voice-prompt readout text.
    fn voice_text(&mut self, text: &str);

    fn update_status_indicator(&mut self, indicator: StatusIndicator);

    fn update_light(&mut self, on: bool, light: Light);

    fn set_power_button_style(&mut self, on: bool);

    /// Device overlay: pads attached (`true`) or the "no electrode" art.
    fn set_device_overlay_style(&mut self, connected: bool);

    /// Battery level observer.
    fn update_battery_level(&mut self, percent: u8);

    fn update_shock_count(&mut self, count: u32);

    /// Seconds since power-on.
    fn update_elapsed_time(&mut self, secs: u64);

    /// Heart-rhythm readout.
    fn show_rhythm(&mut self, rhythm: RhythmClassification);

    fn enable_electrode_pads(&mut self, enabled: bool);

    fn enable_rhythm_selection(&mut self, enabled: bool);

    fn enable_shock_button(&mut self, enabled: bool);

    fn enable_cpr_button(&mut self, enabled: bool);

    /// Return every widget to its powered-off presentation.
    fn reset_ui(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Audio port
// ───────────────────────────────────────────────────────────────

pub trait AudioPort {
    /// Fire-and-forget.  Replaying the cue that is currently playing must
    /// restart it from the beginning (clear the source, then set it).
    fn play_cue(&mut self, cue: Cue);
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: panel switches → domain)
// ───────────────────────────────────────────────────────────────

/// Synchronous queries against the training panel.
pub trait InputPort {
    fn battery_connected(&self) -> bool;

    fn electrode_connected(&self) -> bool;

    fn self_test_diagnostic_passed(&self) -> bool;

    /// `true` = shockable.
    fn classify_rhythm(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Source of simulated time.  The controller calls `sleep` once per
/// simulated second and does its periodic work between calls.
pub trait ClockPort {
    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// timer fires.  The scheduler only reports the label; the caller decides
/// what it means.
pub trait SchedulerDelegate {
    fn on_schedule_fired(&mut self, label: &'static str);
}

// ───────────────────────────────────────────────────────────────
// Bundle
// ───────────────────────────────────────────────────────────────

/// Everything the controller talks to, satisfied by one adapter value.
pub trait DevicePorts: DisplayPort + AudioPort + InputPort + ClockPort + EventSink {}

impl<T> DevicePorts for T where T: DisplayPort + AudioPort + InputPort + ClockPort + EventSink {}
