//! Reversible DC motor driver (L9110S H-bridge).
//!
//! Two direction inputs: IA high = clockwise, IB high = counter-clockwise,
//! both low = stopped. Both high is a brake on this bridge and is never
//! driven.
//!
//! The driver is a dumb actuator; how long it runs is decided by the
//! motor task.

use embedded_hal::digital::PinState;

use crate::app::ports::ActuatorPort;
use crate::pins::Gpio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Clockwise,
    CounterClockwise,
}

pub struct MotorDriver {
    ia: Gpio,
    ib: Gpio,
    state: MotorState,
}

impl MotorDriver {
    pub const fn new(ia: Gpio, ib: Gpio) -> Self {
        Self {
            ia,
            ib,
            state: MotorState::Stopped,
        }
    }

    /// Drive the bridge. The inactive leg is released before the active
    /// one is raised, so both inputs are never high together.
    pub fn drive<P: ActuatorPort>(&mut self, port: &mut P, state: MotorState) {
        let (ia, ib) = match state {
            MotorState::Stopped => (PinState::Low, PinState::Low),
            MotorState::Clockwise => (PinState::High, PinState::Low),
            MotorState::CounterClockwise => (PinState::Low, PinState::High),
        };
        if ia == PinState::High {
            port.write_digital(self.ib, ib);
            port.write_digital(self.ia, ia);
        } else {
            port.write_digital(self.ia, ia);
            port.write_digital(self.ib, ib);
        }
        self.state = state;
    }

    pub fn stop<P: ActuatorPort>(&mut self, port: &mut P) {
        self.drive(port, MotorState::Stopped);
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }
}
