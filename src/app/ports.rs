//! Port traits: the boundary between control logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Tasks (domain)
//! ```
//!
//! Driven adapters (the ESP-IDF hardware adapter, the simulated board,
//! test mocks) implement these traits. Every task owns its own clone of
//! the board, so methods take `&mut self` and adapters keep any shared
//! state behind atomics.

use embedded_hal::digital::PinState;

use crate::drivers::hw_init::HwInitError;
use crate::error::SensorError;
use crate::pins::{AdcChannel, Gpio};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: analog channels and digital inputs.
pub trait SensorPort {
    /// One-time channel setup. Must succeed before the first read.
    fn configure_analog(&mut self, adc: AdcChannel) -> Result<(), HwInitError>;

    /// One-time digital input setup.
    fn configure_input(&mut self, pin: Gpio) -> Result<(), HwInitError>;

    /// Short, bounded-latency read of one ADC channel.
    fn read_analog(&mut self, adc: AdcChannel) -> Result<u16, SensorError>;

    /// Instantaneous level of a digital input (`true` = HIGH).
    fn read_digital(&mut self, pin: Gpio) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: digital outputs.
pub trait ActuatorPort {
    /// One-time output setup; leaves the pin LOW.
    fn configure_output(&mut self, pin: Gpio) -> Result<(), HwInitError>;

    /// Drive an output pin.
    fn write_digital(&mut self, pin: Gpio, state: PinState);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic time and cooperative suspension of the calling task.
pub trait TimePort {
    /// Suspend the calling task for at least `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);

    /// Milliseconds since boot (monotonic).
    fn uptime_ms(&self) -> u64;
}

/// Everything a task needs from the board. Each task gets its own clone.
pub trait Board: SensorPort + ActuatorPort + TimePort + Clone + Send + 'static {}

impl<T> Board for T where T: SensorPort + ActuatorPort + TimePort + Clone + Send + 'static {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → status channel)
// ───────────────────────────────────────────────────────────────

/// Tasks emit structured [`AppEvent`](super::events::AppEvent)s through
/// this port. Fire-and-forget; it never affects control flow.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
