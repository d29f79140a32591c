//! Time sources.
//!
//! Cells only ever ask "what time is it" and compare against their own
//! transition timestamps, so time is a plain millisecond counter from an
//! arbitrary epoch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Milliseconds since the clock's epoch.
pub type Millis = u64;

/// A monotonic "now" reader.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Millis;
}

/// Monotonic clock backed by the tokio timer.
///
/// Follows paused and advanced time in tokio tests. Readings start at
/// [`TokioClock::START`] rather than zero, so cells created right away can
/// still date their last transition into the past.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    epoch: tokio::time::Instant,
}

impl TokioClock {
    /// Reading at the moment the clock is created, about 49 days.
    pub const START: Millis = 1 << 32;

    /// Start a clock reading [`START`](Self::START) at the current instant.
    pub fn new() -> Self {
        Self {
            epoch: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Millis {
        Self::START + self.epoch.elapsed().as_millis() as Millis
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Jump to an absolute time. Never moves backwards.
    pub fn set(&self, now: Millis) {
        self.now.fetch_max(now, Ordering::AcqRel);
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as Millis, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.load(Ordering::Acquire)
    }
}
