//! In-flight guard for asynchronous operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag rejecting overlapping runs of one operation.
///
/// Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct InFlight {
    active: Arc<AtomicBool>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the operation as running.
    ///
    /// Returns `None` while another guard is alive.
    #[must_use]
    pub fn try_begin(&self) -> Option<FlightGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                active: Arc::clone(&self.active),
            })
    }

    /// Whether a guard is alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Clears the in-flight flag on drop.
#[derive(Debug)]
pub struct FlightGuard {
    active: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}
