//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! tagged line to the logger (UART / USB-CDC in production). Sensor
//! faults go out at `warn`, alarm phase changes at `debug`, everything
//! else at `info`.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::Reading;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Sampled { sensor, reading } => match reading {
                Reading::Temperature(t) => info!(
                    "SAMPLE | {} | raw={} R={:.0}\u{03a9} T={:.2}\u{00b0}C/{:.2}\u{00b0}F",
                    sensor.label(),
                    t.raw,
                    t.resistance_ohm,
                    t.celsius,
                    t.fahrenheit,
                ),
                Reading::Light(l) => {
                    info!("SAMPLE | {} | raw={} {:.2}%", sensor.label(), l.raw, l.percent);
                }
            },
            AppEvent::SensorFault { sensor, error } => {
                warn!("FAULT | {} | {}, keeping last value", sensor.label(), error);
            }
            AppEvent::ThresholdCrossed {
                sensor,
                threshold,
                crossing,
                value,
            } => {
                info!(
                    "CROSS | {}.{} | {:?} at {:.2}",
                    sensor.label(),
                    threshold,
                    crossing,
                    value
                );
            }
            AppEvent::OutputChanged { output, on } => {
                info!("OUTPUT | {} {}", output, if *on { "ON" } else { "OFF" });
            }
            AppEvent::Motor { state, light_pct } => {
                info!("MOTOR | {:?} | light={:.2}%", state, light_pct);
            }
            AppEvent::AlarmPhase(phase) => {
                debug!("ALARM | {:?}", phase);
            }
            AppEvent::TaskStarted { name } => {
                info!("TASK | {} started", name);
            }
        }
    }
}
