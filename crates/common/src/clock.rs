//! Injectable time source.
//!
//! All "now" comparisons in the engine (contest expiry, feed ordering) go
//! through a [`Clock`] so tests can pin and advance time deterministically.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// A cloneable time source.
///
/// The default clock reads the system time. A fixed clock returns a pinned
/// instant that tests can move forward with [`Clock::advance`].
#[derive(Debug, Clone, Default)]
pub struct Clock {
    inner: ClockInner,
}

#[derive(Debug, Clone, Default)]
enum ClockInner {
    #[default]
    System,
    Fixed(Arc<Mutex<DateTime<Utc>>>),
}

impl Clock {
    /// Create a clock backed by the system time.
    #[must_use]
    pub fn system() -> Self {
        Self {
            inner: ClockInner::System,
        }
    }

    /// Create a clock pinned to `instant`.
    #[must_use]
    pub fn fixed(instant: DateTime<Utc>) -> Self {
        Self {
            inner: ClockInner::Fixed(Arc::new(Mutex::new(instant))),
        }
    }

    /// Current time according to this clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match &self.inner {
            ClockInner::System => Utc::now(),
            ClockInner::Fixed(instant) => {
                *instant.lock().unwrap_or_else(PoisonError::into_inner)
            }
        }
    }

    /// Move a fixed clock forward by `delta`. No effect on a system clock.
    pub fn advance(&self, delta: Duration) {
        if let ClockInner::Fixed(instant) = &self.inner {
            let mut guard = instant.lock().unwrap_or_else(PoisonError::into_inner);
            *guard += delta;
        }
    }
}
