//! Outbound application events.
//!
//! Tasks emit these through the [`EventSink`](super::ports::EventSink)
//! port. Adapters on the other side decide what to do with them; the
//! firmware only logs them to the serial console.

use crate::alarm::AlarmPhase;
use crate::drivers::motor::MotorState;
use crate::error::SensorError;
use crate::sensors::{ObservationId, Reading};
use crate::threshold::Crossing;

/// Structured events emitted by the tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A sampling task converted a good reading and published it.
    Sampled { sensor: ObservationId, reading: Reading },

    /// A sampling task skipped this cycle.
    SensorFault { sensor: ObservationId, error: SensorError },

    /// A threshold on `sensor` was crossed.
    ThresholdCrossed {
        sensor: ObservationId,
        threshold: &'static str,
        crossing: Crossing,
        value: f32,
    },

    /// A level-triggered output changed state.
    OutputChanged { output: &'static str, on: bool },

    /// The motor changed state; `light_pct` is the observation that
    /// chose the direction.
    Motor { state: MotorState, light_pct: f32 },

    /// The motion alarm entered a new phase.
    AlarmPhase(AlarmPhase),

    /// A task was spawned.
    TaskStarted { name: &'static str },
}
