//! Rhythm classification and routing.
//!
//! The rhythm is never computed from a signal: the trainer selects one (or
//! the input query supplies a shockable/non-shockable answer).  This module
//! only decides what each classification means for the procedure.

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

/// Cardiac rhythm presented to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhythmClassification {
    VentricularFibrillation,
    VentricularTachycardia,
    PulselessElectricalActivity,
    Asystole,
    Regular,
}

impl RhythmClassification {
    pub fn is_shockable(self) -> bool {
        matches!(
            self,
            Self::VentricularFibrillation | Self::VentricularTachycardia
        )
    }

    /// Label shown on the heart-rhythm readout.
    pub fn label(self) -> &'static str {
        match self {
            Self::VentricularFibrillation => "ventricular fibrillation",
            Self::VentricularTachycardia => "ventricular tachycardia",
            Self::PulselessElectricalActivity => "pulseless electrical activity",
            Self::Asystole => "asystole",
            Self::Regular => "regular",
        }
    }
}

impl fmt::Display for RhythmClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Informational end of the procedure; the device stays powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalOutcome {
    PatientPassed,
    RegularHeartbeat,
}

impl TerminalOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::PatientPassed => "patient has passed\n away.",
            Self::RegularHeartbeat => "patient has regular heartbeat.",
        }
    }
}

/// Where the procedure goes after an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RhythmPath {
    Shock,
    Cpr,
    Terminal(TerminalOutcome),
}

/// Result of one assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub rhythm: RhythmClassification,
    pub path: RhythmPath,
    /// Text for the user display.
    pub finding: &'static str,
}

/// Classifies rhythms and counts how many were assessed.
#[derive(Debug, Clone, Default)]
pub struct RhythmAnalyzer {
    assessments: u32,
}

impl RhythmAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure mapping from rhythm to procedure path.
    pub fn route(rhythm: RhythmClassification) -> RhythmPath {
        match rhythm {
            RhythmClassification::VentricularFibrillation
            | RhythmClassification::VentricularTachycardia => RhythmPath::Shock,
            RhythmClassification::PulselessElectricalActivity => RhythmPath::Cpr,
            RhythmClassification::Asystole => RhythmPath::Terminal(TerminalOutcome::PatientPassed),
            RhythmClassification::Regular => {
                RhythmPath::Terminal(TerminalOutcome::RegularHeartbeat)
            }
        }
    }

    /// Assess `rhythm` and record it.
    pub fn assess(&mut self, rhythm: RhythmClassification) -> Assessment {
        let path = Self::route(rhythm);
        let finding = match rhythm {
            RhythmClassification::VentricularFibrillation => {
                "shockable rhythm detected! \n(ventricular fibrillation)"
            }
            RhythmClassification::VentricularTachycardia => {
                "shockable rhythm detected!\n (ventricular tachycardia)"
            }
            RhythmClassification::PulselessElectricalActivity => {
                "shockable rhythm undetected!\n(pulseless electrical activity)"
            }
            RhythmClassification::Asystole => "shockable rhythm not detected!\n(asystole)",
            RhythmClassification::Regular => "shockable rhythm undetected!\n(regular)",
        };
        let assessment = Assessment {
            rhythm,
            path,
            finding,
        };

        self.assessments += 1;
        info!("rhythm assessed: {rhythm} -> {path:?}");
        assessment
    }

    pub fn assessments(&self) -> u32 {
        self.assessments
    }

    /// Forget everything (device reset).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
