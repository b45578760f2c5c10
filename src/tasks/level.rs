//! Level-triggered actuation: heat lamp and indicator bank.
//!
//! Both tasks re-evaluate their rule every period from the latest
//! published observations. Outputs go through [`SwitchedOutput`], so a
//! rule that keeps returning the same answer writes nothing.
//!
//! The heat lamp is held off until both thermistors have published once;
//! the store's neutral `0.0` would otherwise read as a cold enclosure.

use std::sync::Arc;

use crate::app::events::AppEvent;
use crate::app::ports::{Board, EventSink};
use crate::drivers::output::SwitchedOutput;
use crate::pins::Gpio;
use crate::sensors::ObservationId;
use crate::store::ObservationStore;

// ───────────────────────────────────────────────────────────────
// Heat lamp
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatLampRule {
    pub pin: Gpio,
    /// Lamp may only run while outdoor is strictly below this.
    pub outdoor_below_c: f32,
    /// Indoor ceiling, inclusive.
    pub indoor_max_c: f32,
    pub period_ms: u32,
}

impl HeatLampRule {
    pub fn lamp_on(&self, outdoor_c: f32, indoor_c: f32) -> bool {
        outdoor_c < self.outdoor_below_c && indoor_c <= self.indoor_max_c
    }
}

pub struct HeatLampTask<B, E> {
    rule: HeatLampRule,
    lamp: SwitchedOutput,
    board: B,
    sink: E,
    store: Arc<ObservationStore>,
}

impl<B: Board, E: EventSink> HeatLampTask<B, E> {
    pub fn new(rule: HeatLampRule, board: B, sink: E, store: Arc<ObservationStore>) -> Self {
        Self {
            rule,
            lamp: SwitchedOutput::new(rule.pin),
            board,
            sink,
            store,
        }
    }

    /// Evaluate once and drive the lamp. Returns the lamp state.
    pub fn evaluate(&mut self) -> bool {
        let ready = self.store.has_value(ObservationId::OutdoorTemperature)
            && self.store.has_value(ObservationId::IndoorTemperature);
        let outdoor = self.store.read(ObservationId::OutdoorTemperature);
        let indoor = self.store.read(ObservationId::IndoorTemperature);
        let on = ready && self.rule.lamp_on(outdoor, indoor);
        if self.lamp.set_on(&mut self.board, on) {
            self.sink.emit(&AppEvent::OutputChanged {
                output: "heat_lamp",
                on,
            });
        }
        on
    }

    pub fn run(mut self) -> ! {
        loop {
            self.evaluate();
            self.board.sleep_ms(self.rule.period_ms);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Indicator bank
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRule {
    pub heartbeat_a: Gpio,
    pub heartbeat_b: Gpio,
    pub light_led: Gpio,
    pub light_on_above_pct: f32,
    /// How long each LED of the heartbeat pair stays lit. The light LED
    /// is refreshed at the same rate.
    pub period_ms: u32,
}

pub struct IndicatorTask<B, E> {
    rule: IndicatorRule,
    heartbeat_a: SwitchedOutput,
    heartbeat_b: SwitchedOutput,
    light_led: SwitchedOutput,
    beat: bool,
    board: B,
    sink: E,
    store: Arc<ObservationStore>,
}

impl<B: Board, E: EventSink> IndicatorTask<B, E> {
    pub fn new(rule: IndicatorRule, board: B, sink: E, store: Arc<ObservationStore>) -> Self {
        Self {
            rule,
            heartbeat_a: SwitchedOutput::new(rule.heartbeat_a),
            heartbeat_b: SwitchedOutput::new(rule.heartbeat_b),
            light_led: SwitchedOutput::new(rule.light_led),
            beat: false,
            board,
            sink,
            store,
        }
    }

    /// One half-cycle: flip the heartbeat pair, refresh the light LED and
    /// sleep out the period.
    pub fn step(&mut self) {
        self.beat = !self.beat;
        self.heartbeat_a.set_on(&mut self.board, self.beat);
        self.heartbeat_b.set_on(&mut self.board, !self.beat);

        let on = self.store.read(ObservationId::LightFraction) > self.rule.light_on_above_pct;
        if self.light_led.set_on(&mut self.board, on) {
            self.sink.emit(&AppEvent::OutputChanged {
                output: "light_led",
                on,
            });
        }
        self.board.sleep_ms(self.rule.period_ms);
    }

    pub fn light_led_on(&self) -> bool {
        self.light_led.is_on()
    }

    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }
}
