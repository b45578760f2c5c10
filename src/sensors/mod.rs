//! Sensor subsystem: conversions and the identities of every observation.
//!
//! Analog sensors are described by a [`SensorKind`] that selects their
//! conversion; the motion sensor is a plain digital level read by the
//! alarm task and has no observation slot.

pub mod conversion;

use serde::{Deserialize, Serialize};

use crate::error::SensorError;
use conversion::{LightReading, ThermistorReading};

/// One slot in the [`ObservationStore`](crate::store::ObservationStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ObservationId {
    /// Outdoor probe, °C.
    OutdoorTemperature = 0,
    /// Indoor probe, °C.
    IndoorTemperature = 1,
    /// Ambient light, percent of full scale.
    LightFraction = 2,
}

impl ObservationId {
    /// Total number of observations: sizes the store.
    pub const COUNT: usize = 3;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OutdoorTemperature => "outdoor_temp",
            Self::IndoorTemperature => "indoor_temp",
            Self::LightFraction => "light",
        }
    }
}

/// Which conversion an analog channel goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    /// 10 kΩ NTC in a divider with a 10 kΩ fixed resistor.
    Thermistor,
    /// TEMT6000 photo-transistor.
    Light,
}

/// A converted sample, as reported on the status channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Temperature(ThermistorReading),
    Light(LightReading),
}

impl Reading {
    /// The value that gets published for this reading.
    pub fn value(&self) -> f32 {
        match self {
            Self::Temperature(t) => t.celsius,
            Self::Light(l) => l.percent,
        }
    }

    pub fn raw(&self) -> u16 {
        match self {
            Self::Temperature(t) => t.raw,
            Self::Light(l) => l.raw,
        }
    }
}

impl SensorKind {
    pub fn convert(self, raw: u16) -> Result<Reading, SensorError> {
        match self {
            Self::Thermistor => conversion::thermistor(raw).map(Reading::Temperature),
            Self::Light => conversion::light_percent(raw).map(Reading::Light),
        }
    }
}
