//! GPIO / ADC pin assignments for the habitat controller board.
//!
//! Single source of truth: every driver and task graph entry references
//! this module rather than hard-coding pin numbers.

use serde::{Deserialize, Serialize};

/// ESP32 GPIO number.
pub type Gpio = i32;

/// One ADC1 input: the GPIO it is bonded to and its oneshot channel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdcChannel {
    pub gpio: Gpio,
    pub channel: u32,
}

/// Number of ADC1 channels on the ESP32-S3 (GPIO 1–10).
pub const ADC1_CHANNEL_COUNT: u32 = 10;

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// Outdoor NTC thermistor: 10 kΩ @ 25 °C, voltage divider to ADC.
pub const OUTDOOR_NTC_ADC: AdcChannel = AdcChannel { gpio: 4, channel: 3 };

/// Indoor NTC thermistor: same divider as the outdoor probe.
pub const INDOOR_NTC_ADC: AdcChannel = AdcChannel { gpio: 5, channel: 4 };

/// TEMT6000 ambient light sensor.
pub const LIGHT_ADC: AdcChannel = AdcChannel { gpio: 6, channel: 5 };

// ---------------------------------------------------------------------------
// Sensors: Digital
// ---------------------------------------------------------------------------

/// HC-SR501 passive-infrared motion sensor. HIGH = motion present.
pub const PIR_GPIO: Gpio = 21;

// ---------------------------------------------------------------------------
// Indicator bank
// ---------------------------------------------------------------------------

/// Heartbeat LED, first half-period.
pub const HEARTBEAT_A_GPIO: Gpio = 13;
/// Light-threshold LED.
pub const LIGHT_LED_GPIO: Gpio = 14;
/// Heartbeat LED, second half-period.
pub const HEARTBEAT_B_GPIO: Gpio = 15;

// ---------------------------------------------------------------------------
// Heat lamp (relay, active HIGH)
// ---------------------------------------------------------------------------

pub const HEAT_LAMP_GPIO: Gpio = 16;

// ---------------------------------------------------------------------------
// Motor driver (L9110S H-bridge: IA/IB)
// ---------------------------------------------------------------------------

/// HIGH with IB LOW = clockwise.
pub const MOTOR_IA_GPIO: Gpio = 17;
/// HIGH with IA LOW = counter-clockwise.
pub const MOTOR_IB_GPIO: Gpio = 18;

// ---------------------------------------------------------------------------
// Motion alarm
// ---------------------------------------------------------------------------

pub const ALARM_INDICATOR_A_GPIO: Gpio = 38;
pub const ALARM_INDICATOR_B_GPIO: Gpio = 39;
pub const BUZZER_1_GPIO: Gpio = 40;
pub const BUZZER_2_GPIO: Gpio = 41;
