//! Shared observation store.
//!
//! Holds the latest calibrated value of every [`ObservationId`]. Each
//! slot has exactly one producer (its sampling task) and any number of
//! readers. Slots are `AtomicU32`s carrying the `f32` bit pattern, so
//! neither side ever blocks and a reader can never see a torn value.
//!
//! ```text
//! ┌───────────────┐  publish  ┌───────────────────┐  read  ┌──────────────┐
//! │ Sampling task │──────────▶│ ObservationStore  │───────▶│ Actuator task│
//! └───────────────┘           │ [AtomicU32; N]    │        └──────────────┘
//!                             └───────────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::sensors::ObservationId;

/// Latest value per observation. Share it with `Arc`.
pub struct ObservationStore {
    slots: [AtomicU32; ObservationId::COUNT],
    published: [AtomicBool; ObservationId::COUNT],
}

impl Default for ObservationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationStore {
    /// Every slot starts at `0.0` (bit pattern zero).
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU32::new(0) }; ObservationId::COUNT],
            published: [const { AtomicBool::new(false) }; ObservationId::COUNT],
        }
    }

    /// Overwrite the slot for `id`.
    pub fn publish(&self, id: ObservationId, value: f32) {
        self.slots[id.index()].store(value.to_bits(), Ordering::Release);
        self.published[id.index()].store(true, Ordering::Release);
    }

    /// Whether `id` has been published at least once.
    pub fn has_value(&self, id: ObservationId) -> bool {
        self.published[id.index()].load(Ordering::Acquire)
    }

    /// Latest published value for `id`, or `0.0` before the first publish.
    pub fn read(&self, id: ObservationId) -> f32 {
        f32::from_bits(self.slots[id.index()].load(Ordering::Acquire))
    }
}
