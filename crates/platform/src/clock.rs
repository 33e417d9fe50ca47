//! Monotonic time source and spin-wait deadlines.
//!
//! Bit-banged protocols busy-wait on GPIO edges. Each wait is bounded by a
//! [`Deadline`] that is compared against a [`Clock`] on every poll, so the
//! worst-case blocking time is fixed regardless of what the peer does.

use embassy_time::{Duration, Instant};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by the embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// A re-armable timeout window.
///
/// `arm()` starts a new window of `timeout` length at the current time;
/// `expired()` reports whether the window has closed.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    timeout: Duration,
    expires_at: Instant,
}

impl Deadline {
    /// Create a deadline with the given window length. Not armed until
    /// [`Deadline::arm`] is called; an unarmed deadline reads as expired.
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            expires_at: Instant::from_ticks(0),
        }
    }

    /// Window length.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a new window at `now`.
    pub fn arm(&mut self, now: Instant) {
        self.expires_at = now.checked_add(self.timeout).unwrap_or(Instant::MAX);
    }

    /// `true` once `now` has reached the end of the armed window.
    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
