//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use tcr_types::{Clock, Timestamp};

/// A clock that only moves when told to.
///
/// Shareable (`Arc<NullClock>`) so a test can advance the time a deployment
/// observes.
#[derive(Debug, Default)]
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}
