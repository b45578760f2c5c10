//! Threshold crossing detection.
//!
//! A [`Threshold`] fires on the *transition* across its boundary, never
//! on the level alone: a value that stays above the boundary produces no
//! further events. An optional hysteresis band moves the falling edge
//! down to `boundary - hysteresis`.
//!
//! ```text
//!   value ▲
//!         │         ┌──── Rising: prev <= boundary, curr > boundary
//! boundary├─────────┼──────────────────────────
//!         │         │            ┌── Falling: prev > lower, curr <= lower
//!    lower├─────────┴────────────┼─────────────
//!         └──────────────────────┴────────────▶ cycles
//! ```

use serde::{Deserialize, Serialize};

/// Direction of a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossing {
    Rising,
    Falling,
}

/// Immutable boundary with an optional hysteresis band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub boundary: f32,
    /// Width of the band below `boundary`; `0.0` means no band.
    pub hysteresis: f32,
}

impl Threshold {
    pub const fn new(boundary: f32) -> Self {
        Self {
            boundary,
            hysteresis: 0.0,
        }
    }

    pub const fn with_hysteresis(boundary: f32, hysteresis: f32) -> Self {
        Self {
            boundary,
            hysteresis,
        }
    }

    /// The falling-edge boundary.
    pub fn lower(&self) -> f32 {
        self.boundary - self.hysteresis
    }

    /// Decide whether moving from `previous` to `current` crossed this
    /// threshold. Pure; the caller keeps `previous`.
    pub fn evaluate(&self, previous: f32, current: f32) -> Option<Crossing> {
        if previous <= self.boundary && current > self.boundary {
            return Some(Crossing::Rising);
        }
        let lower = self.lower();
        if previous > lower && current <= lower {
            return Some(Crossing::Falling);
        }
        None
    }
}
