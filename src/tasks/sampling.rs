//! Periodic sampling task, one instance per analog sensor.
//!
//! Each cycle: read the channel, convert, publish the value, then compare
//! it against the previous good value for every attached threshold.
//! Crossings that name a wake target signal it; others are only reported.
//!
//! A failed read or conversion skips the cycle entirely. Nothing is
//! published and thresholds are not evaluated, so the previous good value
//! stays the comparison base for the next cycle.

use std::sync::Arc;

use heapless::Vec;
use log::debug;

use crate::app::events::AppEvent;
use crate::app::graph::{MAX_THRESHOLDS, SensorSpec, WakeSignals};
use crate::app::ports::{Board, EventSink};
use crate::error::SensorError;
use crate::store::ObservationStore;
use crate::threshold::Crossing;

/// Crossings fired by one sample, labelled by threshold.
pub type Crossings = Vec<(&'static str, Crossing), MAX_THRESHOLDS>;

pub struct SamplingTask<B, E> {
    spec: SensorSpec,
    board: B,
    sink: E,
    store: Arc<ObservationStore>,
    wakes: WakeSignals,
    previous: Option<f32>,
}

impl<B: Board, E: EventSink> SamplingTask<B, E> {
    pub fn new(
        spec: SensorSpec,
        board: B,
        sink: E,
        store: Arc<ObservationStore>,
        wakes: WakeSignals,
    ) -> Self {
        Self {
            spec,
            board,
            sink,
            store,
            wakes,
            previous: None,
        }
    }

    /// One sampling cycle without the trailing sleep.
    pub fn sample_once(&mut self) -> Result<Crossings, SensorError> {
        let sensor = self.spec.observation;
        let reading = match self
            .board
            .read_analog(self.spec.adc)
            .and_then(|raw| self.spec.kind.convert(raw))
        {
            Ok(r) => r,
            Err(error) => {
                self.sink.emit(&AppEvent::SensorFault { sensor, error });
                return Err(error);
            }
        };

        let value = reading.value();
        self.sink.emit(&AppEvent::Sampled { sensor, reading });
        self.store.publish(sensor, value);

        let mut fired = Crossings::new();
        if let Some(previous) = self.previous {
            for t in &self.spec.thresholds {
                let Some(crossing) = t.threshold.evaluate(previous, value) else {
                    continue;
                };
                if let Some(target) = t.wakes {
                    self.wakes.get(target).signal(crossing);
                    debug!("{} woke {:?} ({:?})", t.label, target, crossing);
                }
                self.sink.emit(&AppEvent::ThresholdCrossed {
                    sensor,
                    threshold: t.label,
                    crossing,
                    value,
                });
                // Capacity equals the threshold count.
                let _ = fired.push((t.label, crossing));
            }
        }
        self.previous = Some(value);
        Ok(fired)
    }

    /// Last good value, used as the base for the next comparison.
    pub fn previous(&self) -> Option<f32> {
        self.previous
    }

    pub fn run(mut self) -> ! {
        loop {
            let _ = self.sample_once();
            self.board.sleep_ms(self.spec.period_ms);
        }
    }
}
