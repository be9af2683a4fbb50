//! Simulated training panel.
//!
//! Implements every port the controller needs on the host:
//!
//! - **InputPort** reads the trainer's switches from [`PanelInputs`],
//!   which is `Sync` and can be flipped from another thread or a scenario
//!   while the controller is mid-step.
//! - **DisplayPort** updates a [`DisplayMirror`] and logs text changes.
//! - **AudioPort** goes to a [`CuePlayer`].
//! - **ClockPort** sleeps a [`ScaledClock`] and advances audio playback.
//! - **EventSink** forwards to a [`LogEventSink`].

use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::{
    AudioPort, ClockPort, Cue, DisplayPort, EventSink, InputPort, Light, StatusIndicator,
};
use crate::battery::FULL_CHARGE;
use crate::rhythm::RhythmClassification;

use super::audio::CuePlayer;
use super::log_sink::LogEventSink;
use super::time::ScaledClock;

// ── Inputs ────────────────────────────────────────────────────

/// Trainer-controlled switches.
#[derive(Debug)]
pub struct PanelInputs {
    battery_seated: AtomicBool,
    pads_attached: AtomicBool,
    diagnostic_ok: AtomicBool,
    shockable: AtomicBool,
}

impl Default for PanelInputs {
    /// Battery seated, diagnostic passing, no pads, non-shockable.
    fn default() -> Self {
        Self {
            battery_seated: AtomicBool::new(true),
            pads_attached: AtomicBool::new(false),
            diagnostic_ok: AtomicBool::new(true),
            shockable: AtomicBool::new(false),
        }
    }
}

impl PanelInputs {
    pub fn set_battery_seated(&self, seated: bool) {
        self.battery_seated.store(seated, Ordering::Release);
    }

    pub fn set_pads_attached(&self, attached: bool) {
        self.pads_attached.store(attached, Ordering::Release);
    }

    pub fn set_diagnostic_ok(&self, ok: bool) {
        self.diagnostic_ok.store(ok, Ordering::Release);
    }

    pub fn set_shockable(&self, shockable: bool) {
        self.shockable.store(shockable, Ordering::Release);
    }
}

// ── Display mirror ────────────────────────────────────────────

/// Everything the device face currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMirror {
    pub user_text: String,
    pub voice_text: String,
    pub indicator: StatusIndicator,
    /// Indexed by `Light::index() - 1`.
    pub lights: [bool; 6],
    pub power_on: bool,
    pub overlay_connected: bool,
    pub battery_percent: u8,
    pub shock_count: u32,
    pub elapsed_secs: u64,
    pub rhythm: Option<RhythmClassification>,
    pub pads_enabled: bool,
    pub rhythm_selection_enabled: bool,
    pub shock_button_enabled: bool,
    pub cpr_button_enabled: bool,
}

impl Default for DisplayMirror {
    fn default() -> Self {
        Self {
            user_text: String::new(),
            voice_text: String::new(),
            indicator: StatusIndicator::Off,
            lights: [false; 6],
            power_on: false,
            overlay_connected: false,
            battery_percent: FULL_CHARGE,
            shock_count: 0,
            elapsed_secs: 0,
            rhythm: None,
            pads_enabled: false,
            rhythm_selection_enabled: false,
            shock_button_enabled: false,
            cpr_button_enabled: false,
        }
    }
}

impl DisplayMirror {
    pub fn light(&self, light: Light) -> bool {
        self.lights[usize::from(light.index() - 1)]
    }
}

// ── SimulatedPanel ────────────────────────────────────────────

pub struct SimulatedPanel {
    inputs: Arc<PanelInputs>,
    display: DisplayMirror,
    audio: CuePlayer,
    clock: ScaledClock,
    sink: LogEventSink,
}

impl SimulatedPanel {
    pub fn new(inputs: Arc<PanelInputs>, clock: ScaledClock) -> Self {
        Self {
            inputs,
            display: DisplayMirror::default(),
            audio: CuePlayer::new(),
            clock,
            sink: LogEventSink::new(),
        }
    }

    /// Shared handle to the switches.
    pub fn inputs(&self) -> Arc<PanelInputs> {
        Arc::clone(&self.inputs)
    }

    pub fn display(&self) -> &DisplayMirror {
        &self.display
    }

    pub fn audio(&self) -> &CuePlayer {
        &self.audio
    }

    pub fn clock(&self) -> &ScaledClock {
        &self.clock
    }

    pub fn events_emitted(&self) -> u64 {
        self.sink.emitted()
    }
}

impl InputPort for SimulatedPanel {
    fn battery_connected(&self) -> bool {
        self.inputs.battery_seated.load(Ordering::Acquire)
    }

    fn electrode_connected(&self) -> bool {
        self.inputs.pads_attached.load(Ordering::Acquire)
    }

    fn self_test_diagnostic_passed(&self) -> bool {
        self.inputs.diagnostic_ok.load(Ordering::Acquire)
    }

    fn classify_rhythm(&self) -> bool {
        self.inputs.shockable.load(Ordering::Acquire)
    }
}

impl DisplayPort for SimulatedPanel {
    fn inform_user(&mut self, text: &str) {
        if self.display.user_text != text {
            info!("DISPLAY | {}", text.replace('\n', " "));
            self.display.user_text = text.to_owned();
        }
    }

    fn voice_text(&mut self, text: &str) {
        if self.display.voice_text != text {
            info!("VOICE   | {}", text.split_whitespace().collect::<Vec<_>>().join(" "));
            self.display.voice_text = text.to_owned();
        }
    }

    fn update_status_indicator(&mut self, indicator: StatusIndicator) {
        debug!("indicator -> {indicator:?}");
        self.display.indicator = indicator;
    }

    fn update_light(&mut self, on: bool, light: Light) {
        self.display.lights[usize::from(light.index() - 1)] = on;
    }

    fn set_power_button_style(&mut self, on: bool) {
        self.display.power_on = on;
    }

    fn set_device_overlay_style(&mut self, connected: bool) {
        self.display.overlay_connected = connected;
    }

    fn update_battery_level(&mut self, percent: u8) {
        self.display.battery_percent = percent;
    }

    fn update_shock_count(&mut self, count: u32) {
        self.display.shock_count = count;
    }

    fn update_elapsed_time(&mut self, secs: u64) {
        self.display.elapsed_secs = secs;
    }

    fn show_rhythm(&mut self, rhythm: RhythmClassification) {
        info!("ECG     | {}", rhythm.label());
        self.display.rhythm = Some(rhythm);
    }

    fn enable_electrode_pads(&mut self, enabled: bool) {
        self.display.pads_enabled = enabled;
    }

    fn enable_rhythm_selection(&mut self, enabled: bool) {
        self.display.rhythm_selection_enabled = enabled;
    }

    fn enable_shock_button(&mut self, enabled: bool) {
        self.display.shock_button_enabled = enabled;
    }

    fn enable_cpr_button(&mut self, enabled: bool) {
        self.display.cpr_button_enabled = enabled;
    }

    fn reset_ui(&mut self) {
        self.display = DisplayMirror::default();
        self.audio.stop();
    }
}

impl AudioPort for SimulatedPanel {
    fn play_cue(&mut self, cue: Cue) {
        self.audio.play_cue(cue);
    }
}

impl ClockPort for SimulatedPanel {
    fn sleep(&mut self, duration: Duration) {
        self.clock.sleep(duration);
        self.audio.advance(duration);
    }
}

impl EventSink for SimulatedPanel {
    fn emit(&mut self, event: &AppEvent) {
        self.sink.emit(event);
    }
}
