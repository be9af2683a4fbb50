//! Scripted training scenarios.
//!
//! A scenario is a JSON document listing what the trainee and the trainer
//! do, in order.  Steps that flip a panel switch (battery seated, self-test
//! diagnostic, classifier answer, pads) update [`PanelInputs`]; steps that
//! press something become an [`AppCommand`] for the controller.
//!
//! ```json
//! { "name": "VF, one shock",
//!   "steps": [ { "action": "hold_power", "ms": 5200 },
//!              { "action": "attach_pads", "pad": "adult" },
//!              { "action": "select_rhythm", "rhythm": "ventricular_fibrillation" },
//!              { "action": "deliver_shock" } ] }
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::adapters::panel::PanelInputs;
use crate::app::commands::AppCommand;
use crate::app::ports::{DevicePorts, PadType};
use crate::app::service::AedController;
use crate::drivers::button::{ButtonEvent, PowerButton};
use crate::rhythm::RhythmClassification;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Hold the power button for `ms` milliseconds.
    HoldPower { ms: u32 },
    SeatBattery { seated: bool },
    SetDiagnostic { passed: bool },
    SetShockable { shockable: bool },
    AttachPads { pad: PadType },
    DetachPads,
    SelectRhythm { rhythm: RhythmClassification },
    AutoAnalyze,
    DeliverShock,
    PerformCpr { depth: u8 },
    FinishCpr,
    SetBattery { level: i32 },
    Idle { secs: u32 },
    ShutDown,
}

impl Step {
    /// Apply the panel-switch side of this step.
    pub fn apply_inputs(&self, inputs: &PanelInputs) {
        match self {
            Self::SeatBattery { seated } => inputs.set_battery_seated(*seated),
            Self::SetDiagnostic { passed } => inputs.set_diagnostic_ok(*passed),
            Self::SetShockable { shockable } => inputs.set_shockable(*shockable),
            Self::AttachPads { .. } => inputs.set_pads_attached(true),
            Self::DetachPads => inputs.set_pads_attached(false),
            _ => {}
        }
    }

    /// Controller command for this step, if it presses anything.
    /// `HoldPower` goes through the button driver instead.
    pub fn command(&self) -> Option<AppCommand> {
        match *self {
            Self::HoldPower { .. }
            | Self::SeatBattery { .. }
            | Self::SetDiagnostic { .. }
            | Self::SetShockable { .. } => None,
            Self::AttachPads { pad } => Some(AppCommand::AttachPads(pad)),
            Self::DetachPads => Some(AppCommand::DetachPads),
            Self::SelectRhythm { rhythm } => Some(AppCommand::SelectRhythm(rhythm)),
            Self::AutoAnalyze => Some(AppCommand::AutoAnalyze),
            Self::DeliverShock => Some(AppCommand::DeliverShock),
            Self::PerformCpr { depth } => Some(AppCommand::PerformCpr { depth }),
            Self::FinishCpr => Some(AppCommand::FinishCpr),
            Self::SetBattery { level } => Some(AppCommand::SetBatteryLevel(level)),
            Self::Idle { secs } => Some(AppCommand::Idle { secs }),
            Self::ShutDown => Some(AppCommand::ShutDown),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Built-in walkthrough: full startup, VF with one shock, CPR, then a
    /// regular rhythm.
    pub fn demo() -> Self {
        Self {
            name: "demo: shockable rhythm, one shock, recovery".into(),
            steps: vec![
                Step::HoldPower { ms: 5200 },
                Step::AttachPads { pad: PadType::Adult },
                Step::SelectRhythm {
                    rhythm: RhythmClassification::VentricularFibrillation,
                },
                Step::DeliverShock,
                Step::PerformCpr { depth: 35 },
                Step::FinishCpr,
                Step::SelectRhythm {
                    rhythm: RhythmClassification::Regular,
                },
                Step::Idle { secs: 10 },
                Step::HoldPower { ms: 5200 },
            ],
        }
    }
}

/// Outcome of a scenario run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    pub steps_run: usize,
    /// Indices of steps whose command failed.
    pub failed_steps: Vec<usize>,
}

impl ScenarioReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed_steps.is_empty()
    }
}

/// Play `scenario` against `controller`, flipping switches on `inputs`.
pub fn run_scenario<H: DevicePorts>(
    controller: &mut AedController<H>,
    inputs: &PanelInputs,
    scenario: &Scenario,
) -> ScenarioReport {
    info!("scenario '{}': {} steps", scenario.name, scenario.steps.len());
    let mut button = PowerButton::new(controller.config().power_hold_ms);
    let mut now_ms: u32 = 0;
    let mut report = ScenarioReport::default();

    for (i, step) in scenario.steps.iter().enumerate() {
        step.apply_inputs(inputs);

        let ok = match step {
            Step::HoldPower { ms } => {
                let event = button.hold_for(now_ms, *ms);
                now_ms = now_ms.wrapping_add(*ms).wrapping_add(1);
                match event {
                    Some(ButtonEvent::LongPress) => {
                        controller.handle_command(AppCommand::PowerButtonHeld)
                    }
                    _ => {
                        info!("power button released after {ms} ms, ignored");
                        true
                    }
                }
            }
            other => match other.command() {
                Some(cmd) => controller.handle_command(cmd),
                None => true,
            },
        };

        report.steps_run += 1;
        if !ok {
            warn!("step {i} ({step:?}) failed: {:?}", controller.last_fault());
            report.failed_steps.push(i);
        }
    }
    report
}
