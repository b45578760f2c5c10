//! Single-slot wake signal between a sampling task and an edge-triggered
//! actuator task.
//!
//! Built on `embassy-sync`'s [`Signal`], which holds at most one value:
//! signalling while a wake is already pending overwrites it instead of
//! queueing a second one. Senders never block.
//!
//! ```text
//!  signal(Rising) ─┐
//!  signal(Falling)─┼──▶ [ slot: Falling ] ──▶ wait() → Falling   (one wake)
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::threshold::Crossing;

/// Coalescing wake notification carrying the most recent crossing.
pub struct WakeSignal {
    slot: Signal<CriticalSectionRawMutex, Crossing>,
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeSignal {
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Mark a wake pending. A wake that is already pending is replaced.
    pub fn signal(&self, crossing: Crossing) {
        self.slot.signal(crossing);
    }

    /// Wait for a pending wake and consume it.
    pub async fn wait(&self) -> Crossing {
        self.slot.wait().await
    }

    /// Block the calling thread until a wake is pending, then consume it.
    pub fn wait_blocking(&self) -> Crossing {
        futures_lite::future::block_on(self.wait())
    }

    /// Consume a pending wake without waiting.
    pub fn try_take(&self) -> Option<Crossing> {
        self.slot.try_take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.signaled()
    }
}
