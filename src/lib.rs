//! Habitat controller firmware library.
//!
//! Everything except the ESP-IDF entry point lives here so the tasks can
//! be exercised on the host against the simulated board. ESP-IDF-specific
//! code is guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod alarm;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod signal;
pub mod store;
pub mod tasks;
pub mod threshold;

pub use error::{Error, Result};
