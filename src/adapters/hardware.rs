//! Hardware adapter: bridges the ESP32-S3 peripherals to the port
//! traits.
//!
//! Holds no peripheral state of its own: the ADC unit handle lives in
//! [`hw_init`](crate::drivers::hw_init) and GPIO levels live in the
//! chip, so every task can own a copy of the adapter.

use embedded_hal::digital::PinState;

use crate::adapters::time::MonotonicClock;
use crate::app::ports::{ActuatorPort, SensorPort, TimePort};
use crate::drivers::hw_init::{self, HwInitError};
use crate::error::SensorError;
use crate::pins::{AdcChannel, Gpio};

#[derive(Debug, Clone, Copy, Default)]
pub struct EspBoard {
    clock: MonotonicClock,
}

impl EspBoard {
    /// Requires [`hw_init::init_peripherals`] to have succeeded.
    pub fn new() -> Self {
        Self {
            clock: MonotonicClock::new(),
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for EspBoard {
    fn configure_analog(&mut self, adc: AdcChannel) -> Result<(), HwInitError> {
        hw_init::configure_adc_channel(adc)
    }

    fn configure_input(&mut self, pin: Gpio) -> Result<(), HwInitError> {
        hw_init::configure_gpio_input(pin)
    }

    fn read_analog(&mut self, adc: AdcChannel) -> Result<u16, SensorError> {
        hw_init::adc1_read(adc.channel)
    }

    fn read_digital(&mut self, pin: Gpio) -> bool {
        hw_init::gpio_read(pin)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for EspBoard {
    fn configure_output(&mut self, pin: Gpio) -> Result<(), HwInitError> {
        hw_init::configure_gpio_output(pin)
    }

    fn write_digital(&mut self, pin: Gpio, state: PinState) {
        hw_init::gpio_write(pin, state == PinState::High);
    }
}

// ── TimePort implementation ───────────────────────────────────

impl TimePort for EspBoard {
    fn sleep_ms(&mut self, ms: u32) {
        self.clock.sleep_ms(ms);
    }

    fn uptime_ms(&self) -> u64 {
        self.clock.uptime_ms()
    }
}
