//! Device controller, the hexagonal core.
//!
//! [`AedController`] owns the device context, the safety monitor and the
//! presentation adapter.  It exposes the scripted procedure as a set of
//! hardware-agnostic operations.  All I/O flows through the
//! [`DevicePorts`] value it was constructed with, so the whole controller
//! runs against mock adapters in tests.
//!
//! ```text
//!  InputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                │         AedController        │
//!  ClockPort ──▶ │ Context · Safety · Analyzer  │ ──▶ DisplayPort / AudioPort
//!                └──────────────────────────────┘
//! ```
//!
//! Steps are written as `try_*` methods returning `Result<_, Fault>` and
//! chained with `?`.  The public operations keep the boolean contract and
//! record the failing fault on the context.

use core::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DeviceConfig;
use crate::error::{Fault, Interlock, Result};
use crate::fsm::DeviceState;
use crate::fsm::context::DeviceContext;
use crate::prompts;
use crate::rhythm::{RhythmClassification, RhythmPath};
use crate::safety::{CancelToken, SafetyMonitor};

use super::commands::AppCommand;
use super::events::{AppEvent, CprFeedback, ShutdownReason};
use super::ports::{Cue, DevicePorts, Light, PadType, StatusIndicator};

// ───────────────────────────────────────────────────────────────
// AedController
// ───────────────────────────────────────────────────────────────

pub struct AedController<H: DevicePorts> {
    ctx: DeviceContext,
    safety: SafetyMonitor,
    /// Source of the rhythm-detection draw.
    rng: StdRng,
    hw: H,
}

impl<H: DevicePorts> AedController<H> {
    /// Construct a powered-off controller.
    pub fn new(config: DeviceConfig, hw: H) -> Self {
        Self::with_rng(config, hw, StdRng::from_entropy())
    }

    /// Same as [`new`](Self::new) with a reproducible rhythm-detection draw.
    pub fn with_seed(config: DeviceConfig, hw: H, seed: u64) -> Self {
        Self::with_rng(config, hw, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: DeviceConfig, mut hw: H, rng: StdRng) -> Self {
        let ctx = DeviceContext::new(config);
        hw.update_battery_level(ctx.battery.level());
        hw.update_shock_count(0);
        Self {
            ctx,
            safety: SafetyMonitor::new(),
            rng,
            hw,
        }
    }

    // ── Power ─────────────────────────────────────────────────

    /// Power-on sequence.  Returns whether the scripted startup ran to
    /// completion.
    ///
    /// Needs charge and a seated battery; otherwise the device is forced
    /// off.  A failed self-test halts the script with the device left on.
    pub fn run(&mut self) -> bool {
        info!("Power button held, starting up");
        let result = self.try_run();
        self.report(result).is_some()
    }

    /// A held power button toggles the device.
    pub fn power_button_held(&mut self) -> bool {
        if self.ctx.powered {
            self.ctx.shut_down(ShutdownReason::PowerButton, &mut self.hw);
            true
        } else {
            self.run()
        }
    }

    /// Unconditional full reset.
    pub fn shut_down_device(&mut self) {
        self.ctx.shut_down(ShutdownReason::Requested, &mut self.hw);
    }

    // ── Scripted steps ────────────────────────────────────────

    pub fn self_test(&mut self) -> bool {
        let result = self.try_self_test();
        self.report(result).is_some()
    }

    pub fn check_responsiveness(&mut self) -> bool {
        let result = self.try_check_responsiveness();
        self.report(result).is_some()
    }

    pub fn call_911(&mut self) -> bool {
        let result = self.try_call_911();
        self.report(result).is_some()
    }

    pub fn electrode_pad(&mut self) -> bool {
        let result = self.try_electrode_pad();
        self.report(result).is_some()
    }

    /// Pads placed on the patient.  While off this only records the
    /// connection; after pad placement was prompted it starts analysis.
    pub fn attach_electrode(&mut self, pad: PadType) -> bool {
        let result = self.try_attach_electrode(pad);
        self.report(result).is_some()
    }

    pub fn detach_electrode(&mut self) {
        info!("electrode detached");
        self.ctx.electrode.connected = false;
        self.ctx.electrode.pad = None;
        self.hw.set_device_overlay_style(false);
    }

    /// Run the safety guard on its own.  `false` when a connection stayed
    /// lost, the device was powered off, or the battery is empty.
    pub fn safety_guard(&mut self) -> bool {
        self.safety.guard(&mut self.ctx, &mut self.hw)
    }

    // ── Rhythm ────────────────────────────────────────────────

    /// Query the classifier.  `false` without querying when no pads are
    /// attached.
    pub fn check_shockable_rhythm(&mut self) -> bool {
        let result = self.try_check_shockable_rhythm();
        self.report(result).unwrap_or(false)
    }

    /// Analysis announcement followed by "shock advised" or "no shock
    /// advised" according to `shockable`.
    ///
    /// The returned decision is an independent fair draw; `shockable` only
    /// selects the advisory.  Callers that route on the return value
    /// ([`auto_analyze`](Self::auto_analyze)) inherit this.
    pub fn detect_rhythm(&mut self, shockable: bool) -> bool {
        let result = self.try_detect_rhythm(shockable);
        self.report(result).unwrap_or(false)
    }

    /// Assess a trainer-selected rhythm and follow its path.  Only valid
    /// while analyzing.
    pub fn analyze_rhythm(&mut self, rhythm: RhythmClassification) -> Option<RhythmPath> {
        let result = self.try_analyze_rhythm(rhythm);
        self.report(result)
    }

    /// Classifier query plus rhythm detection; the detection result picks
    /// the shock or CPR path.
    pub fn auto_analyze(&mut self) -> Option<RhythmPath> {
        let result = self.try_auto_analyze();
        self.report(result)
    }

    // ── Shock ─────────────────────────────────────────────────

    /// Arm the shock button.
    pub fn shock_sequence(&mut self) -> bool {
        let result = self.try_shock_sequence();
        self.report(result).is_some()
    }

    /// Shock button pressed.  Needs an armed shock and an operational
    /// battery; on success CPR follows.
    pub fn deliver_shock(&mut self) -> bool {
        let result = self.try_deliver_shock();
        self.report(result).is_some()
    }

    pub fn increment_shock(&mut self) {
        self.ctx.shock_count = self.ctx.shock_count.saturating_add(1);
        self.hw.update_shock_count(self.ctx.shock_count);
    }

    pub fn shock_count(&self) -> u32 {
        self.ctx.shock_count
    }

    // ── CPR ───────────────────────────────────────────────────

    pub fn cpr_sequence(&mut self) -> bool {
        let result = self.try_cpr_sequence();
        self.report(result).is_some()
    }

    /// One round of compressions at `depth` with coaching.
    pub fn perform_cpr(&mut self, depth: u8) -> Option<CprFeedback> {
        let result = self.try_perform_cpr(depth);
        self.report(result)
    }

    /// CPR done; back to analysis.
    pub fn finish_cpr(&mut self) -> bool {
        let result = self.try_finish_cpr();
        self.report(result).is_some()
    }

    // ── Battery / time ────────────────────────────────────────

    /// Manual level entry.  Out-of-range values are ignored.
    pub fn set_battery_level(&mut self, level: i32) -> bool {
        self.ctx.set_battery_level(level, &mut self.hw)
    }

    /// Let `secs` simulated seconds pass.  While off nothing ticks, but the
    /// clock still runs.
    pub fn idle(&mut self, secs: u32) -> bool {
        if !self.ctx.powered {
            self.hw.sleep(Duration::from_secs(u64::from(secs)));
            return true;
        }
        let result = self.ctx.wait(secs, &mut self.hw);
        self.report(result).is_some()
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a panel or scenario command.  Returns whether it succeeded.
    pub fn handle_command(&mut self, cmd: AppCommand) -> bool {
        debug!("command: {cmd:?}");
        match cmd {
            AppCommand::PowerButtonHeld => self.power_button_held(),
            AppCommand::AttachPads(pad) => self.attach_electrode(pad),
            AppCommand::DetachPads => {
                self.detach_electrode();
                true
            }
            AppCommand::SelectRhythm(rhythm) => self.analyze_rhythm(rhythm).is_some(),
            AppCommand::AutoAnalyze => self.auto_analyze().is_some(),
            AppCommand::DeliverShock => self.deliver_shock(),
            AppCommand::PerformCpr { depth } => self.perform_cpr(depth).is_some(),
            AppCommand::FinishCpr => self.finish_cpr(),
            AppCommand::SetBatteryLevel(level) => self.set_battery_level(level),
            AppCommand::Idle { secs } => self.idle(secs),
            AppCommand::ShutDown => {
                self.shut_down_device();
                true
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> DeviceState {
        self.ctx.state()
    }

    pub fn battery_level(&self) -> u8 {
        self.ctx.battery.level()
    }

    pub fn is_powered(&self) -> bool {
        self.ctx.powered
    }

    pub fn electrode_connected(&self) -> bool {
        self.ctx.electrode.connected
    }

    pub fn pad_type(&self) -> Option<PadType> {
        self.ctx.electrode.pad
    }

    pub fn is_shock_armed(&self) -> bool {
        self.ctx.shock_armed
    }

    /// Simulated seconds since power-on.
    pub fn elapsed_secs(&self) -> u64 {
        self.ctx.elapsed_secs
    }

    /// Most recent step failure.
    pub fn last_fault(&self) -> Option<Fault> {
        self.ctx.last_fault
    }

    pub fn last_shutdown(&self) -> Option<ShutdownReason> {
        self.ctx.last_shutdown
    }

    /// Interlock bitmask latched by the last guard.
    pub fn interlocks(&self) -> u8 {
        self.safety.interlocks()
    }

    /// Number of rhythms assessed since power-on.
    pub fn assessments(&self) -> u32 {
        self.ctx.analyzer.assessments()
    }

    /// Handle for requesting power-off from outside the procedure.
    pub fn cancel_token(&self) -> CancelToken {
        self.ctx.cancel.clone()
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.ctx.config
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    // ── Internal: steps ───────────────────────────────────────

    fn try_run(&mut self) -> Result<()> {
        let state = self.ctx.state();
        if state != DeviceState::Off {
            return Err(Fault::OutOfSequence(state));
        }

        let level = self.ctx.battery.level();
        let seated = self.hw.battery_connected();
        if level == 0 || !seated {
            warn!("power-on refused: battery {level}%, seated={seated}");
            self.ctx.powered = false;
            self.hw.set_power_button_style(false);
            self.hw.emit(&AppEvent::PowerOnRefused);
            return Err(if level == 0 {
                Fault::BatteryDepleted
            } else {
                Fault::ConnectionLost(Interlock::BatteryDisconnected)
            });
        }

        self.ctx.power_on();
        self.hw.set_power_button_style(true);
        self.hw.update_battery_level(level);
        self.hw.emit(&AppEvent::PoweredOn { battery: level });
        info!("Device powered on at {level}%");

        self.ctx.enter(DeviceState::SelfTest, &mut self.hw)?;
        self.try_self_test()?;

        // Pads already on the patient: straight to analysis.
        if self.ctx.electrode.connected {
            info!("pads already attached, skipping to analysis");
            self.hw.update_light(true, Light::Analyzing);
            self.announce_analyzing();
            self.hw.inform_user(prompts::DO_NOT_TOUCH);
            self.ctx.enter(DeviceState::Analyzing, &mut self.hw)?;
            self.wait(self.ctx.config.timings.pre_analysis_secs)?;
            self.hw.enable_rhythm_selection(true);
            return Ok(());
        }

        self.hw.update_light(true, Light::Responsiveness);
        self.say(prompts::STAY_CALM_VOICE, Cue::StayCalm);
        self.wait(self.ctx.config.timings.stay_calm_secs)?;

        self.try_check_responsiveness()?;
        self.try_call_911()?;
        self.try_electrode_pad()
    }

    fn try_self_test(&mut self) -> Result<()> {
        self.require_power()?;
        info!("initiating self test");
        self.hw.inform_user(prompts::SELF_TEST_START);
        for light in Light::SELF_TEST {
            self.hw.update_light(true, light);
        }
        self.wait(self.ctx.config.timings.self_test_lights_secs)?;

        self.hw.inform_user(prompts::CHECKING_BATTERY);
        self.wait(self.ctx.config.timings.self_test_check_secs)?;
        if !self.ctx.battery.is_operational() {
            self.advise_change_batteries();
            return Err(Fault::InsufficientBattery);
        }
        self.hw.inform_user(prompts::BATTERY_OK);
        self.wait(self.ctx.config.timings.self_test_check_secs)?;

        if !self.hw.self_test_diagnostic_passed() {
            self.hw.inform_user(prompts::SELF_TEST_FAILED);
            self.hw.voice_text(prompts::UNIT_FAILED_VOICE);
            self.hw.update_status_indicator(StatusIndicator::NotOk);
            self.hw.play_cue(Cue::UnitFailed);
            return Err(Fault::DiagnosticFailure);
        }
        self.hw.inform_user(prompts::SELF_TEST_PASSED);
        self.wait(self.ctx.config.timings.self_test_check_secs)?;

        self.hw.update_status_indicator(StatusIndicator::Ok);
        self.hw.inform_user(prompts::SELF_TEST_COMPLETE);
        self.say(prompts::UNIT_OK_VOICE, Cue::UnitOk);
        for light in Light::SELF_TEST {
            self.hw.update_light(false, light);
        }
        self.wait(self.ctx.config.timings.unit_ok_secs)?;

        if self.ctx.state() == DeviceState::SelfTest {
            self.ctx.enter(DeviceState::Ready, &mut self.hw)?;
        }
        info!("self test passed");
        Ok(())
    }

    fn try_check_responsiveness(&mut self) -> Result<()> {
        self.require_power()?;
        self.ctx.enter(DeviceState::Responsiveness, &mut self.hw)?;
        self.say(prompts::CHECK_RESPONSIVENESS_VOICE, Cue::CheckResponsiveness);
        self.wait(self.ctx.config.timings.responsiveness_secs)?;
        self.hw.update_light(false, Light::Responsiveness);
        Ok(())
    }

    fn try_call_911(&mut self) -> Result<()> {
        self.require_power()?;
        self.ctx.enter(DeviceState::CallForHelp, &mut self.hw)?;
        self.hw.update_light(true, Light::CallForHelp);
        self.say(prompts::CALL_FOR_HELP_VOICE, Cue::CallForHelp);
        self.wait(self.ctx.config.timings.call_for_help_secs)?;
        self.hw.update_light(false, Light::CallForHelp);
        Ok(())
    }

    fn try_electrode_pad(&mut self) -> Result<()> {
        self.require_power()?;
        self.ctx.enter(DeviceState::ElectrodePlacement, &mut self.hw)?;
        self.hw.update_light(true, Light::AttachPads);
        self.hw.inform_user(prompts::PLACE_PADS);
        self.say(prompts::ATTACH_PADS_VOICE, Cue::AttachPads);
        self.ctx.pads_enabled = true;
        self.hw.enable_electrode_pads(true);
        Ok(())
    }

    fn try_attach_electrode(&mut self, pad: PadType) -> Result<()> {
        info!("electrode attached ({pad:?})");
        self.ctx.electrode.connected = true;
        self.ctx.electrode.pad = Some(pad);

        if !self.ctx.powered {
            self.hw.set_device_overlay_style(true);
            self.hw.inform_user(prompts::ELECTRODE_CONNECTED);
            return Ok(());
        }

        self.hw.inform_user(match pad {
            PadType::Adult => prompts::PLACING_ADULT_PADS,
            PadType::Child => prompts::PLACING_CHILD_PADS,
        });
        if !self.ctx.pads_enabled {
            // Reconnection mid-procedure: the guard picks it up.
            self.hw.set_device_overlay_style(true);
            return Ok(());
        }

        let timings = self.ctx.config.timings.clone();
        self.wait(timings.pad_placement_secs)?;
        self.hw.set_device_overlay_style(true);
        self.hw.inform_user(prompts::ELECTRODE_CONNECTED);
        self.wait(timings.pad_placement_secs)?;

        self.hw.update_light(false, Light::AttachPads);
        self.hw.update_light(true, Light::Analyzing);
        self.guard()?;
        self.hw.inform_user(prompts::CHECKING_RHYTHM);
        self.announce_analyzing();
        self.hw.inform_user(prompts::DO_NOT_TOUCH);
        self.ctx.pads_enabled = false;
        self.hw.enable_electrode_pads(false);
        self.ctx.enter(DeviceState::Analyzing, &mut self.hw)?;
        self.wait(timings.pre_analysis_secs)?;

        self.guard()?;
        self.hw.enable_rhythm_selection(true);
        Ok(())
    }

    fn try_check_shockable_rhythm(&mut self) -> Result<bool> {
        self.guard()?;
        self.require_power()?;
        if !self.ctx.electrode.connected {
            info!("electrode pads not connected, rhythm not classified");
            return Err(Fault::ElectrodeNotConnected);
        }
        Ok(self.hw.classify_rhythm())
    }

    fn try_detect_rhythm(&mut self, shockable: bool) -> Result<bool> {
        self.guard()?;
        let decision = self.rng.gen_range(0..2) == 0;

        self.announce_analyzing();
        self.hw.inform_user(prompts::DO_NOT_TOUCH);
        self.wait(self.ctx.config.timings.analyzing_secs)?;

        self.guard()?;
        if shockable {
            self.say(prompts::SHOCK_ADVISED_VOICE, Cue::ShockAdvised);
        } else {
            self.say(prompts::NO_SHOCK_ADVISED_VOICE, Cue::NoShockAdvised);
        }
        debug!("rhythm detection: advised shockable={shockable}, decision={decision}");
        Ok(decision)
    }

    fn try_analyze_rhythm(&mut self, rhythm: RhythmClassification) -> Result<RhythmPath> {
        self.require_state(DeviceState::Analyzing)?;
        self.hw.enable_rhythm_selection(false);

        if let Err(fault) = self.try_prepare_analysis() {
            // Still analyzing: let the trainer pick again.
            if self.ctx.powered && self.ctx.state() == DeviceState::Analyzing {
                self.hw.enable_rhythm_selection(true);
            }
            return Err(fault);
        }

        let assessment = self.ctx.analyzer.assess(rhythm);
        self.hw.emit(&AppEvent::RhythmAssessed {
            rhythm,
            path: assessment.path,
        });
        self.hw.show_rhythm(rhythm);

        let hold = self.ctx.config.timings.rhythm_result_secs;
        match assessment.path {
            RhythmPath::Shock => {
                self.say(prompts::SHOCK_ADVISED_VOICE, Cue::ShockAdvised);
                self.hw.inform_user(assessment.finding);
                self.hw.update_light(false, Light::Analyzing);
                self.hw.update_light(true, Light::Shock);
                self.wait(hold)?;
                self.try_shock_sequence()?;
            }
            RhythmPath::Cpr => {
                self.say(prompts::NO_SHOCK_ADVISED_VOICE, Cue::NoShockAdvised);
                self.hw.inform_user(assessment.finding);
                self.wait(hold)?;
                self.try_cpr_sequence()?;
            }
            RhythmPath::Terminal(outcome) => {
                self.say(prompts::NO_SHOCK_ADVISED_VOICE, Cue::NoShockAdvised);
                self.hw.inform_user(assessment.finding);
                self.wait(hold)?;
                self.hw.inform_user(outcome.message());
                info!("terminal outcome: {}", outcome.message());
            }
        }
        Ok(assessment.path)
    }

    /// Pads present, analysis advisory and hold, then the guard again.
    fn try_prepare_analysis(&mut self) -> Result<()> {
        self.try_check_shockable_rhythm()?;
        self.announce_analyzing();
        self.wait(self.ctx.config.timings.analyzing_secs)?;
        self.guard()
    }

    fn try_auto_analyze(&mut self) -> Result<RhythmPath> {
        self.require_state(DeviceState::Analyzing)?;
        let shockable = self.try_check_shockable_rhythm()?;
        if self.try_detect_rhythm(shockable)? {
            self.try_shock_sequence()?;
            Ok(RhythmPath::Shock)
        } else {
            self.try_cpr_sequence()?;
            Ok(RhythmPath::Cpr)
        }
    }

    fn try_shock_sequence(&mut self) -> Result<()> {
        self.guard()?;
        self.ctx.enter(DeviceState::ShockAdvised, &mut self.hw)?;
        self.ctx.shock_armed = true;
        self.hw.enable_shock_button(true);
        self.hw.inform_user(prompts::DELIVER_SHOCK);
        Ok(())
    }

    fn try_deliver_shock(&mut self) -> Result<()> {
        self.require_power()?;
        if !self.ctx.shock_armed {
            return Err(Fault::ShockNotArmed);
        }
        if !self.ctx.battery.is_operational() {
            self.advise_change_batteries();
            return Err(Fault::InsufficientBattery);
        }

        self.hw.inform_user(prompts::SHOCK_COUNTDOWN);
        self.say(prompts::SHOCK_COUNTDOWN_VOICE, Cue::ShockDelivering);
        self.wait(self.ctx.config.timings.shock_countdown_secs)?;

        // A drain tick during the countdown may have taken the battery under
        // the minimum.  A refused charge leaves the shock armed.
        let level = match self.ctx.consume_shock(&mut self.hw) {
            Ok(level) => level,
            Err(fault) => {
                self.advise_change_batteries();
                return Err(fault);
            }
        };
        self.ctx.shock_armed = false;
        self.hw.enable_shock_button(false);
        self.increment_shock();
        let count = self.ctx.shock_count;
        info!("Shock {count} delivered, battery {level}%");
        self.hw.emit(&AppEvent::ShockDelivered {
            count,
            battery: level,
        });
        self.ctx.enter(DeviceState::ShockDelivered, &mut self.hw)?;

        self.hw.play_cue(Cue::ShockTone);
        self.wait(self.ctx.config.timings.shock_tone_secs)?;
        self.hw.inform_user(prompts::SHOCK_DELIVERED);
        self.say(prompts::SHOCK_DELIVERED, Cue::ShockDelivered);
        self.wait(self.ctx.config.timings.shock_delivered_secs)?;

        self.try_cpr_sequence()
    }

    fn try_cpr_sequence(&mut self) -> Result<()> {
        self.guard()?;
        self.ctx.enter(DeviceState::Cpr, &mut self.hw)?;
        self.hw.update_light(false, Light::Analyzing);
        self.hw.update_light(false, Light::Shock);
        self.hw.update_light(true, Light::Cpr);
        self.hw.inform_user(prompts::PERFORM_CPR);
        self.say(prompts::START_CPR_VOICE, Cue::StartCpr);
        self.hw.enable_cpr_button(true);
        Ok(())
    }

    fn try_perform_cpr(&mut self, depth: u8) -> Result<CprFeedback> {
        self.require_state(DeviceState::Cpr)?;
        let timings = self.ctx.config.timings.clone();

        self.hw.inform_user(prompts::CPR_DURATION);
        self.wait(timings.cpr_compression_secs)?;

        let feedback = if depth < self.ctx.config.cpr_depth_min {
            CprFeedback::PushHarder
        } else if depth > self.ctx.config.cpr_depth_max {
            CprFeedback::PushGently
        } else {
            CprFeedback::MaintainDepth
        };
        let (text, cue) = match feedback {
            CprFeedback::PushHarder => (prompts::PUSH_HARDER, Cue::PushHarder),
            CprFeedback::PushGently => (prompts::PUSH_GENTLY, Cue::PushGently),
            CprFeedback::MaintainDepth => (prompts::MAINTAIN_DEPTH, Cue::MaintainDepth),
        };
        self.hw.inform_user(text);
        self.say(text, cue);
        self.hw.emit(&AppEvent::CprCoached(feedback));
        debug!("CPR depth {depth}: {feedback:?}");
        self.wait(timings.cpr_feedback_secs)?;

        self.say(prompts::STOP_CPR_VOICE, Cue::StopCpr);
        self.wait(timings.stop_cpr_secs)?;
        Ok(feedback)
    }

    fn try_finish_cpr(&mut self) -> Result<()> {
        self.require_state(DeviceState::Cpr)?;
        self.hw.update_light(false, Light::Cpr);
        self.hw.update_light(true, Light::Analyzing);
        self.hw.enable_cpr_button(false);
        self.ctx.enter(DeviceState::Analyzing, &mut self.hw)?;
        self.hw.enable_rhythm_selection(true);
        self.announce_analyzing();
        self.hw.inform_user(prompts::DO_NOT_TOUCH);
        Ok(())
    }

    // ── Internal: helpers ─────────────────────────────────────

    fn guard(&mut self) -> Result<()> {
        self.safety.check(&mut self.ctx, &mut self.hw)
    }

    fn wait(&mut self, secs: u32) -> Result<()> {
        self.ctx.wait(secs, &mut self.hw)
    }

    fn require_power(&self) -> Result<()> {
        if self.ctx.powered {
            Ok(())
        } else {
            Err(Fault::PoweredOff)
        }
    }

    fn require_state(&self, expected: DeviceState) -> Result<()> {
        self.require_power()?;
        let state = self.ctx.state();
        if state == expected {
            Ok(())
        } else {
            warn!("expected {expected}, device is in {state}");
            Err(Fault::OutOfSequence(state))
        }
    }

    fn say(&mut self, voice: &str, cue: Cue) {
        self.hw.voice_text(voice);
        self.hw.play_cue(cue);
    }

    fn announce_analyzing(&mut self) {
        self.say(prompts::DO_NOT_TOUCH, Cue::DoNotTouchPatient);
    }

    fn advise_change_batteries(&mut self) {
        self.hw.inform_user(prompts::CHANGE_BATTERIES);
        self.say(prompts::CHANGE_BATTERIES_VOICE, Cue::ChangeBatteries);
    }

    /// Collapse a step result, recording the fault on failure.
    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(fault) => {
                self.ctx.record_fault(fault, &mut self.hw);
                None
            }
        }
    }
}
