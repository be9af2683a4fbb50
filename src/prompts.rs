//! User-facing advisory text.
//!
//! `*_VOICE` strings go to the voice-prompt readout, the rest to the main
//! user display.  Line breaks match the trainer's fixed-width display.

pub const SELF_TEST_START: &str = "initiating self test .... ";
pub const CHECKING_BATTERY: &str = "checking battery level...";
pub const BATTERY_OK: &str = "battery has enough charge!";
pub const CHANGE_BATTERIES: &str = "change batteries";
pub const CHANGE_BATTERIES_VOICE: &str = "CHANGE BATTERIES";
pub const SELF_TEST_PASSED: &str = "self test passed!";
pub const SELF_TEST_FAILED: &str = "self test failed";
pub const UNIT_FAILED_VOICE: &str = "UNIT FAILED";
pub const SELF_TEST_COMPLETE: &str =
    "Self test successful! device is on \nand the user can proceed now.";
pub const UNIT_OK_VOICE: &str = "     UNIT OK";

pub const STAY_CALM_VOICE: &str = "     STAY CALM";
pub const CHECK_RESPONSIVENESS_VOICE: &str = "  CHECK RESPONSIVENESS";
pub const CALL_FOR_HELP_VOICE: &str = "    CALL FOR HELP";
pub const PLACE_PADS: &str = "Place adult/child electrode pads on \nthe patient's bare chest.";
pub const ATTACH_PADS_VOICE: &str =
    "ATTACH DEFIBRILLATION\n      PADS TO PATIENTS \n          BARE CHEST";
pub const PLACING_ADULT_PADS: &str = "Placing adult electrode...";
pub const PLACING_CHILD_PADS: &str = "Placing child electrode...";
pub const ELECTRODE_CONNECTED: &str = "electrode connected.";
pub const CHECKING_RHYTHM: &str = "checking if shockable rhythm is \npresent ...";

pub const DO_NOT_TOUCH: &str = "DO NOT TOUCH PATIENT.\n        ANALYZING";
pub const SHOCK_ADVISED_VOICE: &str = "SHOCK ADVISED";
pub const NO_SHOCK_ADVISED_VOICE: &str = "NO SHOCK ADVISED";
pub const DELIVER_SHOCK: &str = "Deliver shock to \nthe patient.";
pub const SHOCK_COUNTDOWN: &str = "SHOCK DELIVERING IN\n 3..2..1";
pub const SHOCK_COUNTDOWN_VOICE: &str = "SHOCK DELIVERING\n IN 3..2..1";
pub const SHOCK_DELIVERED: &str = "SHOCK DELIVERED";

pub const PERFORM_CPR: &str = "Perform CPR on patient.";
pub const START_CPR_VOICE: &str = "START CPR";
pub const CPR_DURATION: &str = "Stop after 2 minutes.\n(10 seconds)";
pub const PUSH_HARDER: &str = "   Push harder.";
pub const PUSH_GENTLY: &str = "   Push gently.";
pub const MAINTAIN_DEPTH: &str = "   Maintain CPR depth.";
pub const STOP_CPR_VOICE: &str = "STOP CPR";

pub const CONNECT_ELECTRODE: &str = "Electrode disconnected.\nPlease connect electrode.";
pub const CONNECT_BATTERY: &str = "Battery disconnected.\nPlease connect battery.";
pub const BATTERY_DRAINED: &str = "Battery drained. \n Device shutting down.";
pub const POWERING_OFF: &str = "Device shutting down.";
