//! System configuration parameters
//!
//! All tunable parameters for the habitat controller. Values are fixed at
//! build time; [`ControllerConfig::validate`] runs once at startup and a
//! failure there is fatal.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which task graph the firmware runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Outdoor thermistor, light sensor, indicator bank.
    Basic,
    /// `Basic` plus the light-driven motor.
    Motor,
    /// Both thermistors, light, motor, heat lamp, motion alarm.
    Full,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub variant: Variant,

    // --- Sampling ---
    /// Light sensor sampling period (milliseconds)
    pub light_period_ms: u32,
    /// Each thermistor channel's sampling period (milliseconds)
    pub temperature_period_ms: u32,

    // --- Level-triggered actuators ---
    /// How long each heartbeat LED stays lit; the indicator task wakes
    /// once per half-period (milliseconds)
    pub indicator_period_ms: u32,
    /// Light LED turns on strictly above this fraction (%)
    pub light_led_on_above_pct: f32,
    /// Heat lamp evaluation period (milliseconds)
    pub heat_lamp_period_ms: u32,
    /// Heat lamp requires outdoor strictly below this (°C)
    pub heat_lamp_outdoor_below_c: f32,
    /// Heat lamp requires indoor at or below this (°C)
    pub heat_lamp_indoor_max_c: f32,

    // --- Motor ---
    /// Light boundary whose crossing wakes the motor (%)
    pub motor_wake_boundary_pct: f32,
    /// Hysteresis band below the wake boundary (%)
    pub motor_wake_hysteresis_pct: f32,
    /// Motor turns clockwise when light is strictly above this (%)
    pub motor_clockwise_above_pct: f32,
    /// How long the motor is driven per wake (milliseconds)
    pub motor_run_ms: u32,

    // --- Motion alarm ---
    /// PIR poll period while idle (milliseconds)
    pub alarm_poll_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Full,

            // Sampling
            light_period_ms: 1000,
            temperature_period_ms: 2000,

            // Level-triggered
            indicator_period_ms: 500,
            light_led_on_above_pct: 60.0,
            heat_lamp_period_ms: 1000,
            heat_lamp_outdoor_below_c: 27.0,
            heat_lamp_indoor_max_c: 30.0,

            // Motor
            motor_wake_boundary_pct: 50.0,
            motor_wake_hysteresis_pct: 0.0,
            motor_clockwise_above_pct: 50.0,
            motor_run_ms: 1000,

            // Alarm
            alarm_poll_ms: 100,
        }
    }
}

impl ControllerConfig {
    /// Default tunables with a different task graph.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON override on top of the defaults
    /// and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|_| ConfigError::ValidationFailed("config JSON does not parse"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a task spin or a rule meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            (self.light_period_ms, "light_period_ms must be > 0"),
            (self.temperature_period_ms, "temperature_period_ms must be > 0"),
            (self.indicator_period_ms, "indicator_period_ms must be > 0"),
            (self.heat_lamp_period_ms, "heat_lamp_period_ms must be > 0"),
            (self.motor_run_ms, "motor_run_ms must be > 0"),
            (self.alarm_poll_ms, "alarm_poll_ms must be > 0"),
        ];
        for (value, msg) in periods {
            if value == 0 {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }

        let percents = [
            (self.light_led_on_above_pct, "light_led_on_above_pct outside 0..=100"),
            (self.motor_wake_boundary_pct, "motor_wake_boundary_pct outside 0..=100"),
            (self.motor_clockwise_above_pct, "motor_clockwise_above_pct outside 0..=100"),
        ];
        for (value, msg) in percents {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }

        if self.motor_wake_hysteresis_pct.is_nan() || self.motor_wake_hysteresis_pct < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "motor_wake_hysteresis_pct must be >= 0",
            ));
        }
        if !self.heat_lamp_outdoor_below_c.is_finite() || !self.heat_lamp_indoor_max_c.is_finite() {
            return Err(ConfigError::ValidationFailed("heat lamp limits must be finite"));
        }
        Ok(())
    }
}
