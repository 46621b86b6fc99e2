//! Time source and the single-slot coalescing timer.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A timer with one slot: scheduling while pending moves the deadline
/// instead of queueing a second firing.
#[derive(Debug, Clone)]
pub struct CoalescingTimer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl CoalescingTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm the timer for `now + delay`. Returns `true` when a pending
    /// deadline was replaced.
    pub fn schedule(&mut self, now: Duration) -> bool {
        self.deadline.replace(now + self.delay).is_some()
    }

    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm and return `true` if the deadline has passed.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
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

    const DELAY: Duration = Duration::from_millis(50);

    #[test]
    fn fires_once_after_delay() {
        let mut timer = CoalescingTimer::new(DELAY);
        assert!(!timer.schedule(Duration::ZERO));
        assert!(!timer.fire_if_due(Duration::from_millis(49)));
        assert!(timer.fire_if_due(Duration::from_millis(50)));
        assert!(!timer.fire_if_due(Duration::from_millis(100)));
    }

    #[test]
    fn rescheduling_extends_the_same_slot() {
        let mut timer = CoalescingTimer::new(DELAY);
        timer.schedule(Duration::ZERO);
        assert!(timer.schedule(Duration::from_millis(40)));
        assert_eq!(timer.deadline(), Some(Duration::from_millis(90)));
        assert!(!timer.fire_if_due(Duration::from_millis(60)));
        assert!(timer.fire_if_due(Duration::from_millis(90)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn cancel() {
        let mut timer = CoalescingTimer::new(DELAY);
        assert!(!timer.cancel());
        timer.schedule(Duration::ZERO);
        assert!(timer.cancel());
        assert!(!timer.fire_if_due(Duration::from_secs(1)));
    }

    #[test]
    fn manual_clock_is_shared() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(5));
        assert_eq!(other.now(), Duration::from_millis(5));
    }
}
