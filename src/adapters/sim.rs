//! Simulated board for host builds.
//!
//! Every clone shares one set of atomics, so a test (or a host demo) can
//! script ADC values and PIR levels from outside while the tasks read
//! them through their own clones. Pin and channel numbers go through the
//! same validity checks as the ESP-IDF adapter.
//!
//! Two clocks are available:
//!
//! - [`SimBoard::new`]: virtual time. `sleep_ms` returns immediately and
//!   advances a shared counter, which keeps single-task tests
//!   deterministic.
//! - [`SimBoard::real_time`]: wall-clock sleeps, for running a whole
//!   graph on host threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use embedded_hal::digital::PinState;

use crate::adapters::time::MonotonicClock;
use crate::app::ports::{ActuatorPort, SensorPort, TimePort};
use crate::drivers::hw_init::{HwInitError, check_adc_channel, check_gpio};
use crate::error::SensorError;
use crate::pins::{ADC1_CHANNEL_COUNT, AdcChannel, Gpio};

/// Stored in an ADC slot to make the next reads fail.
const ADC_FAULT: u32 = u32::MAX;

#[derive(Debug)]
struct SimState {
    adc: [AtomicU32; ADC1_CHANNEL_COUNT as usize],
    analog_configured: AtomicU32,
    inputs: AtomicU64,
    outputs: AtomicU64,
    levels: AtomicU64,
    writes: AtomicU64,
    virtual_ms: AtomicU64,
}

impl SimState {
    fn new() -> Self {
        Self {
            adc: core::array::from_fn(|_| AtomicU32::new(0)),
            analog_configured: AtomicU32::new(0),
            inputs: AtomicU64::new(0),
            outputs: AtomicU64::new(0),
            levels: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            virtual_ms: AtomicU64::new(0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Clock {
    Virtual,
    Real(MonotonicClock),
}

#[derive(Debug, Clone)]
pub struct SimBoard {
    state: Arc<SimState>,
    clock: Clock,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

const fn bit(pin: Gpio) -> u64 {
    1 << (pin as u32)
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            state: Arc::new(SimState::new()),
            clock: Clock::Virtual,
        }
    }

    pub fn real_time() -> Self {
        Self {
            state: Arc::new(SimState::new()),
            clock: Clock::Real(MonotonicClock::new()),
        }
    }

    // ── Scripting ─────────────────────────────────────────────

    /// Value returned by the next reads of `adc`. Values above 4095 are
    /// passed through so range handling can be exercised.
    pub fn set_adc(&self, adc: AdcChannel, raw: u16) {
        if let Some(slot) = self.state.adc.get(adc.channel as usize) {
            slot.store(u32::from(raw), Ordering::Relaxed);
        }
    }

    /// Make reads of `adc` fail until the next [`set_adc`](Self::set_adc).
    pub fn fail_adc(&self, adc: AdcChannel) {
        if let Some(slot) = self.state.adc.get(adc.channel as usize) {
            slot.store(ADC_FAULT, Ordering::Relaxed);
        }
    }

    /// Drive a digital input from outside.
    pub fn set_input(&self, pin: Gpio, high: bool) {
        if check_gpio(pin).is_err() {
            return;
        }
        if high {
            self.state.levels.fetch_or(bit(pin), Ordering::Relaxed);
        } else {
            self.state.levels.fetch_and(!bit(pin), Ordering::Relaxed);
        }
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn level(&self, pin: Gpio) -> bool {
        check_gpio(pin).is_ok() && self.state.levels.load(Ordering::Relaxed) & bit(pin) != 0
    }

    pub fn is_output(&self, pin: Gpio) -> bool {
        check_gpio(pin).is_ok() && self.state.outputs.load(Ordering::Relaxed) & bit(pin) != 0
    }

    pub fn is_input(&self, pin: Gpio) -> bool {
        check_gpio(pin).is_ok() && self.state.inputs.load(Ordering::Relaxed) & bit(pin) != 0
    }

    pub fn is_analog(&self, adc: AdcChannel) -> bool {
        adc.channel < ADC1_CHANNEL_COUNT
            && self.state.analog_configured.load(Ordering::Relaxed) & (1 << adc.channel) != 0
    }

    /// Total output writes across all clones.
    pub fn write_count(&self) -> u64 {
        self.state.writes.load(Ordering::Relaxed)
    }
}

impl SensorPort for SimBoard {
    fn configure_analog(&mut self, adc: AdcChannel) -> Result<(), HwInitError> {
        check_adc_channel(adc)?;
        self.state
            .analog_configured
            .fetch_or(1 << adc.channel, Ordering::Relaxed);
        Ok(())
    }

    fn configure_input(&mut self, pin: Gpio) -> Result<(), HwInitError> {
        check_gpio(pin)?;
        self.state.inputs.fetch_or(bit(pin), Ordering::Relaxed);
        Ok(())
    }

    fn read_analog(&mut self, adc: AdcChannel) -> Result<u16, SensorError> {
        if !self.is_analog(adc) {
            return Err(SensorError::AdcReadFailed);
        }
        match self.state.adc[adc.channel as usize].load(Ordering::Relaxed) {
            ADC_FAULT => Err(SensorError::AdcReadFailed),
            raw => u16::try_from(raw).map_err(|_| SensorError::OutOfRange),
        }
    }

    fn read_digital(&mut self, pin: Gpio) -> bool {
        self.level(pin)
    }
}

impl ActuatorPort for SimBoard {
    fn configure_output(&mut self, pin: Gpio) -> Result<(), HwInitError> {
        check_gpio(pin)?;
        self.state.outputs.fetch_or(bit(pin), Ordering::Relaxed);
        self.state.levels.fetch_and(!bit(pin), Ordering::Relaxed);
        Ok(())
    }

    fn write_digital(&mut self, pin: Gpio, state: PinState) {
        if !self.is_output(pin) {
            log::warn!("sim: write to unconfigured GPIO {}", pin);
            return;
        }
        self.set_input(pin, state == PinState::High);
        self.state.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl TimePort for SimBoard {
    fn sleep_ms(&mut self, ms: u32) {
        match self.clock {
            Clock::Virtual => {
                self.state
                    .virtual_ms
                    .fetch_add(u64::from(ms), Ordering::Relaxed);
            }
            Clock::Real(clock) => clock.sleep_ms(ms),
        }
    }

    fn uptime_ms(&self) -> u64 {
        match self.clock {
            Clock::Virtual => self.state.virtual_ms.load(Ordering::Relaxed),
            Clock::Real(clock) => clock.uptime_ms(),
        }
    }
}
