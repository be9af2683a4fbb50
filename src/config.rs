//! Device configuration parameters
//!
//! All tunable parameters for the AED simulator.  Durations are in
//! simulated seconds; the clock adapter decides how long a simulated
//! second lasts in wall time.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    // --- Battery ---
    /// Minimum charge (%) for self-test and shock delivery
    pub min_operating_battery_percent: u8,
    /// Charge (%) consumed by one shock
    pub shock_cost_percent: u8,
    /// Seconds between one-percent drain ticks while powered
    pub drain_interval_secs: u32,

    // --- Safety ---
    /// Seconds between connectivity re-checks while an interlock is open
    pub connection_poll_secs: u32,
    /// Re-checks allowed per interlock before the guard gives up
    pub max_connection_polls: u32,

    // --- Power button ---
    /// Hold time (ms) that counts as a power toggle
    pub power_hold_ms: u32,

    // --- CPR coaching ---
    /// Compression depth below which the user is told to push harder
    pub cpr_depth_min: u8,
    /// Compression depth above which the user is told to push gently
    pub cpr_depth_max: u8,

    // --- Script timing ---
    pub timings: StepTimings,
}

/// Hold durations for each scripted advisory, in simulated seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTimings {
    pub self_test_lights_secs: u32,
    pub self_test_check_secs: u32,
    pub unit_ok_secs: u32,
    pub stay_calm_secs: u32,
    pub responsiveness_secs: u32,
    pub call_for_help_secs: u32,
    pub pad_placement_secs: u32,
    pub pre_analysis_secs: u32,
    pub analyzing_secs: u32,
    pub rhythm_result_secs: u32,
    pub shock_countdown_secs: u32,
    pub shock_tone_secs: u32,
    pub shock_delivered_secs: u32,
    pub cpr_compression_secs: u32,
    pub cpr_feedback_secs: u32,
    pub stop_cpr_secs: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Battery
            min_operating_battery_percent: 5,
            shock_cost_percent: 5,
            drain_interval_secs: 60, // 1 %/min

            // Safety
            connection_poll_secs: 1,
            max_connection_polls: 120, // 2 min per interlock

            // Power button
            power_hold_ms: 5000,

            // CPR
            cpr_depth_min: 40,
            cpr_depth_max: 60,

            timings: StepTimings::default(),
        }
    }
}

impl Default for StepTimings {
    fn default() -> Self {
        Self {
            self_test_lights_secs: 2,
            self_test_check_secs: 2,
            unit_ok_secs: 3,
            stay_calm_secs: 2,
            responsiveness_secs: 4,
            call_for_help_secs: 4,
            pad_placement_secs: 2,
            pre_analysis_secs: 2,
            analyzing_secs: 4,
            rhythm_result_secs: 2,
            shock_countdown_secs: 4,
            shock_tone_secs: 2,
            shock_delivered_secs: 3,
            cpr_compression_secs: 6,
            cpr_feedback_secs: 5,
            stop_cpr_secs: 3,
        }
    }
}

impl DeviceConfig {
    /// Reject values the controller cannot operate with.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_operating_battery_percent == 0 || self.min_operating_battery_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "min_operating_battery_percent must be 1..=100",
            ));
        }
        if self.shock_cost_percent > 100 {
            return Err(ConfigError::ValidationFailed("shock_cost_percent must be <= 100"));
        }
        if self.drain_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("drain_interval_secs must be > 0"));
        }
        if self.connection_poll_secs == 0 {
            return Err(ConfigError::ValidationFailed("connection_poll_secs must be > 0"));
        }
        if self.max_connection_polls == 0 {
            return Err(ConfigError::ValidationFailed("max_connection_polls must be > 0"));
        }
        if self.power_hold_ms == 0 {
            return Err(ConfigError::ValidationFailed("power_hold_ms must be > 0"));
        }
        if self.cpr_depth_min > self.cpr_depth_max {
            return Err(ConfigError::ValidationFailed(
                "cpr_depth_min must not exceed cpr_depth_max",
            ));
        }
        Ok(())
    }

    /// Parse a JSON document (missing fields take defaults) and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors from loading or validating a [`DeviceConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Document is not valid JSON for this schema.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
