//! Switched digital output (indicator LED, heat-lamp relay, buzzer).
//!
//! Remembers the last level it drove so repeated requests for the same
//! state never touch the pin. The first call always writes, which puts
//! the hardware in a known state.

use embedded_hal::digital::PinState;

use crate::app::ports::ActuatorPort;
use crate::pins::Gpio;

pub struct SwitchedOutput {
    pin: Gpio,
    state: Option<PinState>,
}

impl SwitchedOutput {
    pub const fn new(pin: Gpio) -> Self {
        Self { pin, state: None }
    }

    /// Drive the pin to `state`. Returns `true` if the pin was written.
    pub fn set<P: ActuatorPort>(&mut self, port: &mut P, state: PinState) -> bool {
        if self.state == Some(state) {
            return false;
        }
        port.write_digital(self.pin, state);
        self.state = Some(state);
        true
    }

    pub fn set_on<P: ActuatorPort>(&mut self, port: &mut P, on: bool) -> bool {
        self.set(port, PinState::from(on))
    }

    pub fn is_on(&self) -> bool {
        self.state == Some(PinState::High)
    }
}
