//! Leading-edge throttle with a trailing flush.
//!
//! The first request in a quiet period fires immediately. Requests that arrive
//! inside the window are coalesced into a single pending flag, which the caller
//! flushes once the window has elapsed. A burst therefore costs at most one
//! leading and one trailing invocation per window.
//!
//! Time is always passed in, so callers decide where `now` comes from.

use std::time::Duration;
use web_time::Instant;

use crate::constants::DEFAULT_THROTTLE_INTERVAL;

/// What the caller should do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttled {
    /// Run the work now.
    Fire,
    /// Work is pending; arm a timer for the remaining part of the window.
    Later(Duration),
    /// Nothing to do. Either a timer is already armed or nothing is pending.
    Skip,
}

/// Rate limiter for reposition requests.
#[derive(Debug, Clone)]
pub struct Throttle {
    /// Minimum time between two invocations.
    interval: Duration,

    /// When the work last ran.
    last_fire: Option<Instant>,

    /// Whether a request was suppressed since the last run.
    pending: bool,
}

impl Throttle {
    /// Create a throttle with the given window.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Register a request at `now`.
    pub fn request(&mut self, now: Instant) -> Throttled {
        match self.remaining(now) {
            None => {
                self.fire(now);
                Throttled::Fire
            }
            Some(_) if self.pending => Throttled::Skip,
            Some(remaining) => {
                self.pending = true;
                log::trace!("Throttle: suppressed, flush in {:?}", remaining);
                Throttled::Later(remaining)
            }
        }
    }

    /// Called when the armed timer elapses.
    ///
    /// Timers may fire slightly early, in which case the remaining time is
    /// returned so the caller can re-arm.
    pub fn flush(&mut self, now: Instant) -> Throttled {
        if !self.pending {
            return Throttled::Skip;
        }
        match self.remaining(now) {
            None => {
                self.fire(now);
                Throttled::Fire
            }
            Some(remaining) => Throttled::Later(remaining),
        }
    }

    /// Forget all timing state.
    pub fn reset(&mut self) {
        self.last_fire = None;
        self.pending = false;
    }

    fn fire(&mut self, now: Instant) {
        self.last_fire = Some(now);
        self.pending = false;
    }

    /// Time left in the current window, or `None` if the window is closed.
    fn remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_fire?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.interval {
            None
        } else {
            Some(self.interval - elapsed)
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_request_fires_immediately() {
        let mut throttle = Throttle::new(ms(60));
        assert_eq!(throttle.request(Instant::now()), Throttled::Fire);
        assert!(!throttle.is_pending());
    }

    #[test]
    fn test_burst_is_coalesced() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(60));

        assert_eq!(throttle.request(t0), Throttled::Fire);
        assert_eq!(throttle.request(t0 + ms(10)), Throttled::Later(ms(50)));
        assert_eq!(throttle.request(t0 + ms(20)), Throttled::Skip);
        assert_eq!(throttle.request(t0 + ms(30)), Throttled::Skip);
        assert!(throttle.is_pending());

        assert_eq!(throttle.flush(t0 + ms(60)), Throttled::Fire);
        assert!(!throttle.is_pending());
        // Nothing left to flush
        assert_eq!(throttle.flush(t0 + ms(200)), Throttled::Skip);
    }

    #[test]
    fn test_early_flush_reports_remaining() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(60));

        throttle.request(t0);
        throttle.request(t0 + ms(5));
        assert_eq!(throttle.flush(t0 + ms(40)), Throttled::Later(ms(20)));
        assert!(throttle.is_pending());
    }

    #[test]
    fn test_request_after_window_fires_again() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(60));

        throttle.request(t0);
        assert_eq!(throttle.request(t0 + ms(61)), Throttled::Fire);
    }

    #[test]
    fn test_reset_reopens_window() {
        let t0 = Instant::now();
        let mut throttle = Throttle::default();

        throttle.request(t0);
        throttle.request(t0 + ms(1));
        throttle.reset();
        assert!(!throttle.is_pending());
        assert_eq!(throttle.request(t0 + ms(2)), Throttled::Fire);
    }
}
