//! Application core.
//!
//! Declares which tasks exist ([`graph`]), starts them
//! ([`orchestrator`]), and defines the port traits ([`ports`]) and the
//! events ([`events`]) that separate the tasks from the board and the
//! status channel.

pub mod events;
pub mod graph;
pub mod orchestrator;
pub mod ports;
