//! Motion-alarm output group: two indicator LEDs and a dual-channel
//! buzzer. Owned by the alarm task only.

use crate::alarm::AlarmPattern;
use crate::app::ports::ActuatorPort;
use crate::drivers::output::SwitchedOutput;
use crate::pins::Gpio;

pub struct AlarmOutputs {
    indicator_a: SwitchedOutput,
    indicator_b: SwitchedOutput,
    buzzer_1: SwitchedOutput,
    buzzer_2: SwitchedOutput,
}

impl AlarmOutputs {
    pub const fn new(indicator_a: Gpio, indicator_b: Gpio, buzzer_1: Gpio, buzzer_2: Gpio) -> Self {
        Self {
            indicator_a: SwitchedOutput::new(indicator_a),
            indicator_b: SwitchedOutput::new(indicator_b),
            buzzer_1: SwitchedOutput::new(buzzer_1),
            buzzer_2: SwitchedOutput::new(buzzer_2),
        }
    }

    pub fn apply<P: ActuatorPort>(&mut self, port: &mut P, pattern: AlarmPattern) {
        self.indicator_a.set_on(port, pattern.indicator_a);
        self.indicator_b.set_on(port, pattern.indicator_b);
        self.buzzer_1.set_on(port, pattern.buzzers);
        self.buzzer_2.set_on(port, pattern.buzzers);
    }

    /// Pattern currently on the pins, as last driven.
    pub fn pattern(&self) -> AlarmPattern {
        AlarmPattern {
            indicator_a: self.indicator_a.is_on(),
            indicator_b: self.indicator_b.is_on(),
            buzzers: self.buzzer_1.is_on() && self.buzzer_2.is_on(),
        }
    }
}
