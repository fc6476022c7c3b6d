//! Cancelable delayed delivery.
//!
//! A [`Debouncer`] coalesces bursts of triggers into a single delivery once
//! the quiescence interval has elapsed since the most recent trigger. The
//! owner drives it by calling [`Debouncer::poll`] from its event loop, and
//! bypasses it with [`Debouncer::flush`] when a delivery must happen now.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

/// Monotonic time source measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time based on [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Externally advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, to: Duration) {
        self.nanos.fetch_max(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Single pending delivery with a fixed quiescence interval.
#[derive(Debug, Clone)]
pub struct Debouncer<C: Clock = SystemClock> {
    interval: Duration,
    deadline: Option<Duration>,
    clock: C,
}

impl Debouncer<SystemClock> {
    /// Debouncer on the system clock.
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(interval, SystemClock::default())
    }
}

impl<C: Clock> Debouncer<C> {
    pub fn with_clock(interval: Duration, clock: C) -> Self {
        Self {
            interval,
            deadline: None,
            clock,
        }
    }

    /// Quiescence interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The underlying clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Cancel any pending delivery and schedule a new one.
    pub fn schedule(&mut self) {
        let deadline = self.clock.now() + self.interval;
        trace!(?deadline, replaced = self.deadline.is_some(), "debounce scheduled");
        self.deadline = Some(deadline);
    }

    /// Drop the pending delivery, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending delivery so the caller can deliver immediately.
    ///
    /// Returns whether a delivery was pending.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn debouncer() -> (Debouncer<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (Debouncer::with_clock(INTERVAL, clock.clone()), clock)
    }

    #[test]
    fn test_idle_never_fires() {
        let (mut d, clock) = debouncer();
        clock.advance(Duration::from_secs(5));
        assert!(!d.poll());
        assert!(!d.is_pending());
    }

    #[test]
    fn test_fires_after_interval() {
        let (mut d, clock) = debouncer();
        d.schedule();
        clock.advance(Duration::from_millis(99));
        assert!(!d.poll());
        clock.advance(Duration::from_millis(1));
        assert!(d.poll());
        assert!(!d.poll(), "Delivery must happen once");
    }

    #[test]
    fn test_reschedule_pushes_deadline() {
        let (mut d, clock) = debouncer();
        d.schedule();
        clock.advance(Duration::from_millis(60));
        d.schedule();
        clock.advance(Duration::from_millis(60));
        assert!(!d.poll());
        clock.advance(Duration::from_millis(40));
        assert!(d.poll());
    }

    #[test]
    fn test_cancel() {
        let (mut d, clock) = debouncer();
        d.schedule();
        d.cancel();
        clock.advance(INTERVAL * 2);
        assert!(!d.poll());
    }

    #[test]
    fn test_flush_reports_pending() {
        let (mut d, clock) = debouncer();
        assert!(!d.flush());
        d.schedule();
        assert!(d.flush());
        clock.advance(INTERVAL);
        assert!(!d.poll());
    }

    #[test]
    fn test_manual_clock_shared_and_monotonic() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(10));
        assert_eq!(other.now(), Duration::from_millis(10));
        other.set(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(10));
        other.set(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(50));
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock::default();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any burst of triggers spaced under the interval fires once.
        #[test]
        fn prop_burst_fires_once(gaps in prop::collection::vec(0u64..100, 1..40)) {
            let clock = ManualClock::new();
            let mut d = Debouncer::with_clock(Duration::from_millis(100), clock.clone());
            let mut fired = 0;
            for gap in gaps {
                d.schedule();
                clock.advance(Duration::from_millis(gap));
                if d.poll() {
                    fired += 1;
                }
            }
            clock.advance(Duration::from_millis(100));
            if d.poll() {
                fired += 1;
            }
            prop_assert_eq!(fired, 1);
        }
    }
}
