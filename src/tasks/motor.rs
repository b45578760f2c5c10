//! Edge-triggered motor task.
//!
//! Sleeps on its [`WakeSignal`] until a light crossing fires, then runs
//! the motor once for a fixed time in the direction the current light
//! level picks. Wakes that arrive mid-run collapse into one pending wake,
//! so a burst of crossings costs at most one extra run.

use std::sync::Arc;

use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{Board, EventSink};
use crate::drivers::motor::{MotorDriver, MotorState};
use crate::pins::Gpio;
use crate::sensors::ObservationId;
use crate::signal::WakeSignal;
use crate::store::ObservationStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorRule {
    pub ia: Gpio,
    pub ib: Gpio,
    pub clockwise_above_pct: f32,
    pub run_ms: u32,
}

impl MotorRule {
    pub fn direction(&self, light_pct: f32) -> MotorState {
        if light_pct > self.clockwise_above_pct {
            MotorState::Clockwise
        } else {
            MotorState::CounterClockwise
        }
    }
}

pub struct MotorTask<B, E> {
    rule: MotorRule,
    driver: MotorDriver,
    board: B,
    sink: E,
    store: Arc<ObservationStore>,
    wake: Arc<WakeSignal>,
}

impl<B: Board, E: EventSink> MotorTask<B, E> {
    pub fn new(
        rule: MotorRule,
        board: B,
        sink: E,
        store: Arc<ObservationStore>,
        wake: Arc<WakeSignal>,
    ) -> Self {
        Self {
            rule,
            driver: MotorDriver::new(rule.ia, rule.ib),
            board,
            sink,
            store,
            wake,
        }
    }

    /// Drive for `run_ms` in the direction chosen from one light read,
    /// then stop. Returns the direction that was run.
    pub fn run_once(&mut self) -> MotorState {
        let light_pct = self.store.read(ObservationId::LightFraction);
        let direction = self.rule.direction(light_pct);

        self.driver.drive(&mut self.board, direction);
        self.sink.emit(&AppEvent::Motor {
            state: direction,
            light_pct,
        });
        self.board.sleep_ms(self.rule.run_ms);

        self.driver.stop(&mut self.board);
        self.sink.emit(&AppEvent::Motor {
            state: MotorState::Stopped,
            light_pct,
        });
        direction
    }

    /// Consume a pending wake without blocking. Returns `None` when
    /// nothing was pending.
    pub fn poll(&mut self) -> Option<MotorState> {
        self.wake.try_take().map(|_| self.run_once())
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn run(mut self) -> ! {
        loop {
            let crossing = self.wake.wait_blocking();
            debug!("motor woken by {:?} crossing", crossing);
            self.run_once();
        }
    }
}
