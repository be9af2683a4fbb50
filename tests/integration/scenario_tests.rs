//! Scripted scenarios played against the simulated panel.

use std::sync::Arc;

use aedsim::adapters::panel::{PanelInputs, SimulatedPanel};
use aedsim::adapters::time::ScaledClock;
use aedsim::app::ports::{Light, PadType};
use aedsim::app::service::AedController;
use aedsim::config::DeviceConfig;
use aedsim::error::{Fault, Interlock};
use aedsim::fsm::DeviceState;
use aedsim::rhythm::RhythmClassification;
use aedsim::scenario::{Scenario, Step, run_scenario};

fn panel_controller() -> (AedController<SimulatedPanel>, Arc<PanelInputs>) {
    let inputs = Arc::new(PanelInputs::default());
    let panel = SimulatedPanel::new(Arc::clone(&inputs), ScaledClock::instant());
    (
        AedController::with_seed(DeviceConfig::default(), panel, 11),
        inputs,
    )
}

#[test]
fn demo_runs_clean_and_powers_off() {
    let (mut ctrl, inputs) = panel_controller();
    let report = run_scenario(&mut ctrl, &inputs, &Scenario::demo());

    assert!(report.all_succeeded(), "failed: {:?}", report.failed_steps);
    assert_eq!(report.steps_run, Scenario::demo().steps.len());
    assert_eq!(ctrl.state(), DeviceState::Off);
    assert!(!ctrl.is_powered());
    assert_eq!(ctrl.shock_count(), 0, "shutdown resets the count");
    assert!(ctrl.hw().events_emitted() > 0);
    assert!(ctrl.hw().clock().simulated().as_secs() > 40);
}

#[test]
fn unseated_battery_refuses_power_on() {
    let (mut ctrl, inputs) = panel_controller();
    let scenario = Scenario {
        name: "no battery".into(),
        steps: vec![
            Step::SeatBattery { seated: false },
            Step::HoldPower { ms: 5200 },
        ],
    };
    let report = run_scenario(&mut ctrl, &inputs, &scenario);

    assert_eq!(report.failed_steps, vec![1]);
    assert!(!ctrl.is_powered());
    assert_eq!(
        ctrl.last_fault(),
        Some(Fault::ConnectionLost(Interlock::BatteryDisconnected))
    );
}

#[test]
fn short_press_is_ignored() {
    let (mut ctrl, inputs) = panel_controller();
    let scenario = Scenario {
        name: "tap".into(),
        steps: vec![Step::HoldPower { ms: 1000 }],
    };
    let report = run_scenario(&mut ctrl, &inputs, &scenario);

    assert!(report.all_succeeded());
    assert!(!ctrl.is_powered());
    assert_eq!(ctrl.state(), DeviceState::Off);
}

#[test]
fn shock_then_cpr_updates_the_display() {
    let (mut ctrl, inputs) = panel_controller();
    let scenario = Scenario {
        name: "vt".into(),
        steps: vec![
            Step::HoldPower { ms: 5000 },
            Step::AttachPads { pad: PadType::Child },
            Step::SelectRhythm {
                rhythm: RhythmClassification::VentricularTachycardia,
            },
            Step::DeliverShock,
        ],
    };
    let report = run_scenario(&mut ctrl, &inputs, &scenario);

    assert!(report.all_succeeded(), "failed: {:?}", report.failed_steps);
    assert_eq!(ctrl.state(), DeviceState::Cpr);
    assert_eq!(ctrl.pad_type(), Some(PadType::Child));
    let display = ctrl.hw().display();
    assert_eq!(display.shock_count, 1);
    assert_eq!(display.battery_percent, ctrl.battery_level());
    assert!(display.light(Light::Cpr));
    assert!(display.cpr_button_enabled);
    assert!(!display.shock_button_enabled);
    assert_eq!(
        display.rhythm,
        Some(RhythmClassification::VentricularTachycardia)
    );
}

#[test]
fn pads_removed_mid_scenario_stall_analysis() {
    let config = DeviceConfig {
        max_connection_polls: 3,
        ..DeviceConfig::default()
    };
    let inputs = Arc::new(PanelInputs::default());
    let panel = SimulatedPanel::new(Arc::clone(&inputs), ScaledClock::instant());
    let mut ctrl = AedController::with_seed(config, panel, 3);

    let scenario = Scenario {
        name: "pads off".into(),
        steps: vec![
            Step::HoldPower { ms: 5200 },
            Step::AttachPads { pad: PadType::Adult },
            Step::DetachPads,
            Step::SelectRhythm {
                rhythm: RhythmClassification::Asystole,
            },
        ],
    };
    let report = run_scenario(&mut ctrl, &inputs, &scenario);

    assert_eq!(report.failed_steps, vec![3]);
    assert_eq!(
        ctrl.last_fault(),
        Some(Fault::ConnectionLost(Interlock::ElectrodeDisconnected))
    );
    assert!(ctrl.is_powered());
    assert!(!ctrl.hw().display().overlay_connected);
}
