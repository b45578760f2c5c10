//! Actuator drivers, hardware initialisation, and task spawning.

pub mod alarm;
pub mod hw_init;
pub mod motor;
pub mod output;
pub mod task_pin;
