// crates/deflect-economics/src/clock.rs
//
// Manually advanced clock, the stand-in for block timestamps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use deflect_core::identity::Timestamp;
use deflect_core::traits::Clock;

/// Cloneable handle over a shared timestamp. Every clone observes the same
/// time, so a test can keep one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Move forward by `seconds`.
    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Jump to `timestamp`. Going backwards is ignored.
    pub fn set(&self, timestamp: Timestamp) {
        let previous = self.now.fetch_max(timestamp, Ordering::SeqCst);
        if timestamp < previous {
            tracing::warn!(
                "Ignoring clock update to {} (already at {})",
                timestamp,
                previous
            );
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
