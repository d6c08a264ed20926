#![forbid(unsafe_code)]

//! Single-shot "stopped typing" timer.
//!
//! A [`Debouncer`] holds at most one pending deadline. Every
//! [`restart`](Debouncer::restart) replaces the previous deadline, so only
//! the most recent restart can ever fire. The timer never reads the clock on
//! its own: callers pass `now` in, which keeps it deterministic under test.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use suggest_core::debounce::Debouncer;
//!
//! let mut timer = Debouncer::new(Duration::from_millis(800));
//! let t0 = Instant::now();
//! timer.restart(t0);
//! assert!(!timer.poll(t0 + Duration::from_millis(500)));
//! timer.restart(t0 + Duration::from_millis(500));
//! assert!(!timer.poll(t0 + Duration::from_millis(900)));
//! assert!(timer.poll(t0 + Duration::from_millis(1300)));
//! assert!(!timer.poll(t0 + Duration::from_millis(2000)));
//! ```

use std::time::{Duration, Instant};

/// Quiet period after the last text change before "stopped typing" fires.
pub const STOPPED_TYPING_INTERVAL: Duration = Duration::from_millis(800);

/// Cancellable single-shot timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    deadline: Option<Instant>,
    /// Bumped on every restart; identifies the pending deadline.
    generation: u64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(STOPPED_TYPING_INTERVAL)
    }
}

impl Debouncer {
    /// Create an idle timer with the given quiet interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            generation: 0,
        }
    }

    /// The quiet interval.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule a fire at `now + interval`, replacing any pending one.
    ///
    /// Returns the generation of the new deadline.
    pub fn restart(&mut self, now: Instant) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = Some(now + self.interval);
        self.generation
    }

    /// Drop the pending deadline. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Whether a deadline is pending.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Generation of the most recent restart.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left until the pending deadline (zero if already due).
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Fire if the pending deadline has been reached.
    ///
    /// Returns `true` exactly once per restart; the deadline is consumed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn idle_timer_never_fires() {
        let mut timer = Debouncer::default();
        let t0 = Instant::now();
        assert!(!timer.is_pending());
        assert!(!timer.poll(t0 + ms(10_000)));
        assert_eq!(timer.remaining(t0), None);
    }

    #[test]
    fn default_interval_is_stopped_typing() {
        assert_eq!(Debouncer::default().interval(), ms(800));
    }

    #[test]
    fn fires_once_at_deadline() {
        let mut timer = Debouncer::new(ms(800));
        let t0 = Instant::now();
        timer.restart(t0);
        assert!(!timer.poll(t0 + ms(799)));
        assert!(timer.poll(t0 + ms(800)));
        assert!(!timer.poll(t0 + ms(801)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn restart_supersedes_previous_deadline() {
        let mut timer = Debouncer::new(ms(800));
        let t0 = Instant::now();
        let first = timer.restart(t0);
        let second = timer.restart(t0 + ms(400));
        assert!(second > first);
        assert_eq!(timer.generation(), second);
        assert!(!timer.poll(t0 + ms(800)));
        assert!(timer.poll(t0 + ms(1200)));
    }

    #[test]
    fn cancel_drops_pending() {
        let mut timer = Debouncer::new(ms(800));
        let t0 = Instant::now();
        timer.restart(t0);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.poll(t0 + ms(5000)));
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let mut timer = Debouncer::new(ms(800));
        let t0 = Instant::now();
        timer.restart(t0);
        assert_eq!(timer.remaining(t0 + ms(300)), Some(ms(500)));
        assert_eq!(timer.remaining(t0 + ms(900)), Some(Duration::ZERO));
    }
}
