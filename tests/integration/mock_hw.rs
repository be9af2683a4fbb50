//! Mock training panel for integration tests.
//!
//! Records every display call, cue, event and sleep so tests can assert on
//! the full history without a UI.  Inputs are plain fields; the
//! `*_after` triggers flip them (or request power-off) once a given
//! number of simulated seconds has been slept.

use std::time::Duration;

use aedsim::app::events::AppEvent;
use aedsim::app::ports::{
    AudioPort, ClockPort, Cue, DisplayPort, EventSink, InputPort, Light, StatusIndicator,
};
use aedsim::app::service::AedController;
use aedsim::config::DeviceConfig;
use aedsim::error::Fault;
use aedsim::fsm::DeviceState;
use aedsim::rhythm::RhythmClassification;
use aedsim::safety::CancelToken;

// ── Display call record ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Inform(String),
    Voice(String),
    Indicator(StatusIndicator),
    Light { on: bool, light: Light },
    PowerStyle(bool),
    Overlay(bool),
    Battery(u8),
    Shocks(u32),
    Elapsed(u64),
    Rhythm(RhythmClassification),
    Pads(bool),
    RhythmSelection(bool),
    ShockButton(bool),
    CprButton(bool),
    ResetUi,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<DisplayCall>,
    pub cues: Vec<Cue>,
    pub events: Vec<AppEvent>,
    /// Simulated seconds slept.
    pub sleeps: u64,

    pub battery_seated: bool,
    pub pads_attached: bool,
    pub diagnostic_ok: bool,
    pub shockable: bool,

    /// Request power-off once `sleeps` reaches the count.
    pub cancel_after: Option<(u64, CancelToken)>,
    /// Re-attach pads once `sleeps` reaches the count.
    pub attach_pads_after: Option<u64>,
    /// Re-seat the battery once `sleeps` reaches the count.
    pub seat_battery_after: Option<u64>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            cues: Vec::new(),
            events: Vec::new(),
            sleeps: 0,
            battery_seated: true,
            pads_attached: false,
            diagnostic_ok: true,
            shockable: false,
            cancel_after: None,
            attach_pads_after: None,
            seat_battery_after: None,
        }
    }

    pub fn informed(&self, text: &str) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, DisplayCall::Inform(t) if t == text))
    }

    pub fn inform_count(&self, text: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DisplayCall::Inform(t) if t == text))
            .count()
    }

    pub fn voiced(&self, text: &str) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, DisplayCall::Voice(t) if t == text))
    }

    pub fn played(&self, cue: Cue) -> bool {
        self.cues.contains(&cue)
    }

    pub fn called(&self, call: &DisplayCall) -> bool {
        self.calls.contains(call)
    }

    /// Last state the panel was told for `light`.
    pub fn light_on(&self, light: Light) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                DisplayCall::Light { on, light: l } if *l == light => Some(*on),
                DisplayCall::ResetUi => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn last_indicator(&self) -> Option<StatusIndicator> {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::Indicator(i) => Some(*i),
            _ => None,
        })
    }

    /// Every state entered, in order.
    pub fn states_entered(&self) -> Vec<DeviceState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn faults(&self) -> Vec<Fault> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::FaultDetected(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    pub fn emitted(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockHardware {
    fn battery_connected(&self) -> bool {
        self.battery_seated
    }

    fn electrode_connected(&self) -> bool {
        self.pads_attached
    }

    fn self_test_diagnostic_passed(&self) -> bool {
        self.diagnostic_ok
    }

    fn classify_rhythm(&self) -> bool {
        self.shockable
    }
}

impl DisplayPort for MockHardware {
    fn inform_user(&mut self, text: &str) {
        self.calls.push(DisplayCall::Inform(text.to_owned()));
    }

    fn voice_text(&mut self, text: &str) {
        self.calls.push(DisplayCall::Voice(text.to_owned()));
    }

    fn update_status_indicator(&mut self, indicator: StatusIndicator) {
        self.calls.push(DisplayCall::Indicator(indicator));
    }

    fn update_light(&mut self, on: bool, light: Light) {
        self.calls.push(DisplayCall::Light { on, light });
    }

    fn set_power_button_style(&mut self, on: bool) {
        self.calls.push(DisplayCall::PowerStyle(on));
    }

    fn set_device_overlay_style(&mut self, connected: bool) {
        self.calls.push(DisplayCall::Overlay(connected));
    }

    fn update_battery_level(&mut self, percent: u8) {
        self.calls.push(DisplayCall::Battery(percent));
    }

    fn update_shock_count(&mut self, count: u32) {
        self.calls.push(DisplayCall::Shocks(count));
    }

    fn update_elapsed_time(&mut self, secs: u64) {
        self.calls.push(DisplayCall::Elapsed(secs));
    }

    fn show_rhythm(&mut self, rhythm: RhythmClassification) {
        self.calls.push(DisplayCall::Rhythm(rhythm));
    }

    fn enable_electrode_pads(&mut self, enabled: bool) {
        self.calls.push(DisplayCall::Pads(enabled));
    }

    fn enable_rhythm_selection(&mut self, enabled: bool) {
        self.calls.push(DisplayCall::RhythmSelection(enabled));
    }

    fn enable_shock_button(&mut self, enabled: bool) {
        self.calls.push(DisplayCall::ShockButton(enabled));
    }

    fn enable_cpr_button(&mut self, enabled: bool) {
        self.calls.push(DisplayCall::CprButton(enabled));
    }

    fn reset_ui(&mut self) {
        self.calls.push(DisplayCall::ResetUi);
    }
}

impl AudioPort for MockHardware {
    fn play_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

impl ClockPort for MockHardware {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps += duration.as_secs();
        if let Some((n, token)) = &self.cancel_after {
            if self.sleeps >= *n {
                token.request();
            }
        }
        if self.attach_pads_after.is_some_and(|n| self.sleeps >= n) {
            self.pads_attached = true;
        }
        if self.seat_battery_after.is_some_and(|n| self.sleeps >= n) {
            self.battery_seated = true;
        }
    }
}

impl EventSink for MockHardware {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Controller helpers ────────────────────────────────────────

pub type Controller = AedController<MockHardware>;

/// Drain far slower than any test runs, short guard budget.
#[allow(dead_code)]
pub fn test_config() -> DeviceConfig {
    DeviceConfig {
        drain_interval_secs: 1_000_000,
        max_connection_polls: 5,
        ..DeviceConfig::default()
    }
}

#[allow(dead_code)]
pub fn controller() -> Controller {
    controller_with(test_config(), 7)
}

#[allow(dead_code)]
pub fn controller_with(config: DeviceConfig, seed: u64) -> Controller {
    AedController::with_seed(config, MockHardware::new(), seed)
}

/// Power on and run the script up to pad placement.
#[allow(dead_code)]
pub fn to_placement(ctrl: &mut Controller) {
    assert!(ctrl.run(), "startup failed: {:?}", ctrl.last_fault());
    assert_eq!(ctrl.state(), DeviceState::ElectrodePlacement);
}

/// Power on and attach adult pads, ending in analysis.
#[allow(dead_code)]
pub fn to_analyzing(ctrl: &mut Controller) {
    to_placement(ctrl);
    ctrl.hw_mut().pads_attached = true;
    assert!(
        ctrl.attach_electrode(aedsim::app::ports::PadType::Adult),
        "attach failed: {:?}",
        ctrl.last_fault()
    );
    assert_eq!(ctrl.state(), DeviceState::Analyzing);
}
