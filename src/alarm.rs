//! Motion alarm sequencer.
//!
//! A fixed five-phase pattern played while the PIR trigger stays active.
//! The trigger is checked at every phase boundary; if it has dropped, the
//! sequencer falls back to `Idle` (all outputs off) for one poll period.
//!
//! ```text
//!            active          active         active          active
//!   Idle ──────────▶ ChirpA ───────▶ GapA ────────▶ ChirpB ───────▶ GapB
//!    ▲               150 ms          100 ms         300 ms          100 ms
//!    │                 │               │              │               │
//!    └──── inactive ───┴───────────────┴──────────────┴───────────────┘
//!                                  (GapB ── active ──▶ ChirpA)
//! ```
//!
//! The durations and pin groupings are an audible/visual contract and
//! are not configurable.

/// Outputs asserted during a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmPattern {
    pub indicator_a: bool,
    pub indicator_b: bool,
    /// Both buzzer channels.
    pub buzzers: bool,
}

impl AlarmPattern {
    pub const OFF: Self = Self {
        indicator_a: false,
        indicator_b: false,
        buzzers: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmPhase {
    Idle,
    ChirpA,
    GapA,
    ChirpB,
    GapB,
}

pub const CHIRP_A_MS: u32 = 150;
pub const GAP_A_MS: u32 = 100;
pub const CHIRP_B_MS: u32 = 300;
pub const GAP_B_MS: u32 = 100;

impl AlarmPhase {
    /// Phase duration; `Idle` lasts one poll period.
    pub const fn duration_ms(self, poll_ms: u32) -> u32 {
        match self {
            Self::Idle => poll_ms,
            Self::ChirpA => CHIRP_A_MS,
            Self::GapA => GAP_A_MS,
            Self::ChirpB => CHIRP_B_MS,
            Self::GapB => GAP_B_MS,
        }
    }

    /// Next phase while the trigger stays active.
    pub const fn successor(self) -> Self {
        match self {
            Self::Idle | Self::GapB => Self::ChirpA,
            Self::ChirpA => Self::GapA,
            Self::GapA => Self::ChirpB,
            Self::ChirpB => Self::GapB,
        }
    }

    pub const fn pattern(self) -> AlarmPattern {
        match self {
            Self::ChirpA => AlarmPattern {
                indicator_a: true,
                indicator_b: false,
                buzzers: true,
            },
            Self::ChirpB => AlarmPattern {
                indicator_a: false,
                indicator_b: true,
                buzzers: true,
            },
            Self::Idle | Self::GapA | Self::GapB => AlarmPattern::OFF,
        }
    }
}

/// Timed state machine. Time is supplied by the caller, so the current
/// phase and how long it has run can be inspected at any point.
#[derive(Debug, Clone)]
pub struct AlarmSequencer {
    phase: AlarmPhase,
    entered_at_ms: u64,
    poll_ms: u32,
}

impl AlarmSequencer {
    pub fn new(poll_ms: u32) -> Self {
        Self {
            phase: AlarmPhase::Idle,
            entered_at_ms: 0,
            poll_ms,
        }
    }

    /// Take the phase-boundary decision and enter the resulting phase.
    pub fn advance(&mut self, trigger_active: bool, now_ms: u64) -> AlarmPhase {
        self.phase = if trigger_active {
            self.phase.successor()
        } else {
            AlarmPhase::Idle
        };
        self.entered_at_ms = now_ms;
        self.phase
    }

    pub fn phase(&self) -> AlarmPhase {
        self.phase
    }

    pub fn phase_duration_ms(&self) -> u32 {
        self.phase.duration_ms(self.poll_ms)
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.entered_at_ms)
    }

    /// Time left in the current phase; zero once the boundary is reached.
    pub fn remaining_ms(&self, now_ms: u64) -> u32 {
        let left = u64::from(self.phase_duration_ms()).saturating_sub(self.elapsed_ms(now_ms));
        left as u32
    }

    pub fn at_boundary(&self, now_ms: u64) -> bool {
        self.remaining_ms(now_ms) == 0
    }
}
