use std::time::{Duration, Instant};

// ── Cancellable interval ──────────────────────────────────────────────────────

/// A periodic timer as an explicit handle. The owner polls `fire()` from the
/// app tick; once `stop()` is called the handle never fires again. Dropping
/// the owner drops the handle, so cleanup-on-close holds by ownership.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Instant,
    active: bool,
}

impl Interval {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self { period, next: now + period, active: true }
    }

    /// Fire immediately on the first poll, then on the period.
    pub fn immediate(period: Duration, now: Instant) -> Self {
        Self { period, next: now, active: true }
    }

    /// True when the period has elapsed; re-arms for the next tick.
    /// Never fires twice for one elapsed period, and skips ahead rather than
    /// bursting if polling stalled for several periods.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.active || now < self.next {
            return false;
        }
        self.next = now + self.period;
        true
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_period_and_rearms() {
        let t0 = Instant::now();
        let mut iv = Interval::new(Duration::from_millis(100), t0);
        assert!(!iv.fire(t0));
        assert!(!iv.fire(t0 + Duration::from_millis(99)));
        assert!(iv.fire(t0 + Duration::from_millis(100)));
        // re-armed relative to the fire time
        assert!(!iv.fire(t0 + Duration::from_millis(150)));
        assert!(iv.fire(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn immediate_fires_on_first_poll() {
        let t0 = Instant::now();
        let mut iv = Interval::immediate(Duration::from_millis(50), t0);
        assert!(iv.fire(t0));
        assert!(!iv.fire(t0));
    }

    #[test]
    fn stopped_interval_never_fires() {
        let t0 = Instant::now();
        let mut iv = Interval::immediate(Duration::from_millis(10), t0);
        iv.stop();
        assert!(!iv.fire(t0 + Duration::from_secs(60)));
        assert!(!iv.is_active());
    }
}
