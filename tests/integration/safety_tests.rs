//! Integration tests for the safety guard: connectivity waits, the poll
//! budget, cancellation by power-off and depletion.

use aedsim::app::events::{AppEvent, ShutdownReason};
use aedsim::error::{Fault, Interlock};
use aedsim::fsm::DeviceState;
use aedsim::prompts;
use aedsim::rhythm::{RhythmClassification, RhythmPath};

use super::mock_hw::{DisplayCall, controller, to_analyzing};

#[test]
fn guard_holds_until_electrode_returns() {
    let mut ctrl = controller();
    to_analyzing(&mut ctrl);
    let now = ctrl.hw().sleeps;
    ctrl.hw_mut().pads_attached = false;
    ctrl.hw_mut().attach_pads_after = Some(now + 3);

    assert_eq!(
        ctrl.analyze_rhythm(RhythmClassification::PulselessElectricalActivity),
        Some(RhythmPath::Cpr)
    );
    let hw = ctrl.hw();
    assert_eq!(hw.inform_count(prompts::CONNECT_ELECTRODE), 3);
    assert!(hw.called(&DisplayCall::Overlay(false)));
    assert_eq!(
        hw.calls
            .iter()
            .rev()
            .find(|c| matches!(c, DisplayCall::Overlay(_))),
        Some(&DisplayCall::Overlay(true))
    );
    assert!(hw.emitted(&AppEvent::InterlockChanged {
        interlock: Interlock::ElectrodeDisconnected,
        open: true
    }));
    assert!(hw.emitted(&AppEvent::InterlockChanged {
        interlock: Interlock::ElectrodeDisconnected,
        open: false
    }));
    assert_eq!(ctrl.interlocks(), 0);
}

#[test]
fn guard_holds_until_battery_reseated() {
    let mut ctrl = controller();
    to_analyzing(&mut ctrl);
    let now = ctrl.hw().sleeps;
    ctrl.hw_mut().battery_seated = false;
    ctrl.hw_mut().seat_battery_after = Some(now + 2);
    ctrl.hw_mut().shockable = true;

    assert!(ctrl.check_shockable_rhythm());
    assert_eq!(ctrl.hw().inform_count(prompts::CONNECT_BATTERY), 2);
    assert!(ctrl.is_powered());
}

#[test]
fn guard_gives_up_after_poll_budget() {
    let mut ctrl = controller();
    to_analyzing(&mut ctrl);
    ctrl.hw_mut().pads_attached = false;

    assert_eq!(ctrl.analyze_rhythm(RhythmClassification::Regular), None);
    assert_eq!(
        ctrl.last_fault(),
        Some(Fault::ConnectionLost(Interlock::ElectrodeDisconnected))
    );
    let budget = ctrl.config().max_connection_polls as usize;
    assert_eq!(ctrl.hw().inform_count(prompts::CONNECT_ELECTRODE), budget);
    assert!(ctrl.is_powered(), "giving up does not power off");
    assert_eq!(ctrl.state(), DeviceState::Analyzing);
    assert_eq!(ctrl.interlocks(), Interlock::ElectrodeDisconnected.mask());
}

#[test]
fn power_off_cancels_guard_wait() {
    let mut ctrl = controller();
    to_analyzing(&mut ctrl);
    let now = ctrl.hw().sleeps;
    let token = ctrl.cancel_token();
    ctrl.hw_mut().pads_attached = false;
    ctrl.hw_mut().cancel_after = Some((now + 2, token));

    assert_eq!(
        ctrl.analyze_rhythm(RhythmClassification::VentricularFibrillation),
        None
    );
    assert_eq!(ctrl.last_fault(), Some(Fault::PoweredOff));
    assert_eq!(ctrl.last_shutdown(), Some(ShutdownReason::PowerButton));
    assert_eq!(ctrl.state(), DeviceState::Off);
    assert!(!ctrl.is_powered());
    assert!(ctrl.hw().sleeps <= now + 2);
    assert!(!ctrl.cancel_token().is_requested(), "request consumed");
}

#[test]
fn empty_battery_fails_guard_and_resets() {
    let mut ctrl = controller();
    to_analyzing(&mut ctrl);
    ctrl.set_battery_level(0);

    assert!(!ctrl.check_shockable_rhythm());
    assert_eq!(ctrl.last_fault(), Some(Fault::BatteryDepleted));
    assert_eq!(ctrl.state(), DeviceState::Off);
    assert_eq!(ctrl.battery_level(), 100);
    assert!(ctrl.hw().informed(prompts::BATTERY_DRAINED));
    assert!(
        ctrl.hw()
            .emitted(&AppEvent::ShutDown(ShutdownReason::BatteryDepleted))
    );
}

#[test]
fn empty_battery_ends_connectivity_wait() {
    let mut ctrl = controller();
    to_analyzing(&mut ctrl);
    ctrl.set_battery_level(0);
    ctrl.hw_mut().pads_attached = false;

    assert!(!ctrl.detect_rhythm(true));
    assert_eq!(ctrl.last_fault(), Some(Fault::BatteryDepleted));
    assert_eq!(ctrl.state(), DeviceState::Off);
}

#[test]
fn guard_fails_while_off() {
    let mut ctrl = controller();
    assert!(!ctrl.check_shockable_rhythm());
    assert!(!ctrl.shock_sequence());
    assert!(!ctrl.cpr_sequence());
    assert_eq!(ctrl.last_fault(), Some(Fault::PoweredOff));
    assert_eq!(ctrl.hw().sleeps, 0);
}
