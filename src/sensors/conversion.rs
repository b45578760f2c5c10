//! Raw ADC sample → physical quantity.
//!
//! Both conversions are total over `u16`: every input either maps to a
//! finite value or to a [`SensorError`]. Nothing here panics or returns
//! NaN/infinity.

use crate::error::SensorError;

/// ADC full-scale count (12-bit).
pub const ADC_MAX: u16 = 4095;
/// ADC reference voltage.
pub const V_REF: f32 = 3.3;

/// Fixed divider resistor, equal to the thermistor's R25.
pub const R1_OHMS: f32 = 10_000.0;
/// NTC Beta constant.
pub const BETA: f32 = 3950.0;
/// Reference temperature for R25, in kelvin.
pub const T0_K: f32 = 298.15;

const KELVIN_OFFSET: f32 = 273.15;

/// Result of one thermistor conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermistorReading {
    pub raw: u16,
    pub resistance_ohm: f32,
    pub celsius: f32,
    pub fahrenheit: f32,
}

/// Result of one light-sensor conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightReading {
    pub raw: u16,
    pub percent: f32,
}

/// Light fraction in percent of full scale.
///
/// A zero count means the photo-transistor output is floating or shorted;
/// it is reported as invalid instead of 0 %.
pub fn light_percent(raw: u16) -> Result<LightReading, SensorError> {
    if raw > ADC_MAX {
        return Err(SensorError::OutOfRange);
    }
    if raw == 0 {
        return Err(SensorError::InvalidReading);
    }
    Ok(LightReading {
        raw,
        percent: 100.0 * f32::from(raw) / f32::from(ADC_MAX),
    })
}

/// Thermistor temperature via divider inversion and the Beta model.
///
/// `raw == 0` divides by zero volts and `raw == ADC_MAX` gives a zero
/// resistance whose logarithm is undefined; both are invalid.
pub fn thermistor(raw: u16) -> Result<ThermistorReading, SensorError> {
    if raw > ADC_MAX {
        return Err(SensorError::OutOfRange);
    }
    if raw == 0 || raw == ADC_MAX {
        return Err(SensorError::InvalidReading);
    }

    let voltage = f32::from(raw) * V_REF / f32::from(ADC_MAX);
    let resistance_ohm = R1_OHMS * (V_REF - voltage) / voltage;
    if !resistance_ohm.is_finite() || resistance_ohm <= 0.0 {
        return Err(SensorError::InvalidReading);
    }

    let inv_t = 1.0 / T0_K + (resistance_ohm / R1_OHMS).ln() / BETA;
    if !inv_t.is_finite() || inv_t <= 0.0 {
        return Err(SensorError::InvalidReading);
    }

    let celsius = 1.0 / inv_t - KELVIN_OFFSET;
    if !celsius.is_finite() {
        return Err(SensorError::InvalidReading);
    }

    Ok(ThermistorReading {
        raw,
        resistance_ohm,
        celsius,
        fahrenheit: celsius * 9.0 / 5.0 + 32.0,
    })
}
