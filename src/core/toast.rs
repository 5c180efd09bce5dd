use std::collections::VecDeque;
use std::time::{Duration, Instant};

// ── Toast ─────────────────────────────────────────────────────────────────────

pub const TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastKind {
    Achievement,
    Confetti,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

/// Transient notifications, one visible at a time, arrival order, no
/// priority. Widgets never talk to this directly; the app forwards bus
/// signals into `push`.
pub struct ToastQueue {
    pending: VecDeque<Toast>,
    active: Option<(Toast, Instant)>,
    duration: Duration,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::with_duration(TOAST_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self { pending: VecDeque::new(), active: None, duration }
    }

    pub fn push(&mut self, toast: Toast) {
        self.pending.push_back(toast);
    }

    /// Advance dismissal and promotion. The visible toast swaps out only
    /// after its full duration, so bursts show strictly one at a time.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, shown_at)) = &self.active {
            if now.duration_since(*shown_at) < self.duration {
                return;
            }
            self.active = None;
        }
        if let Some(next) = self.pending.pop_front() {
            self.active = Some((next, now));
        }
    }

    pub fn visible(&self) -> Option<&Toast> {
        self.active.as_ref().map(|(t, _)| t)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(text: &str) -> Toast {
        Toast { kind: ToastKind::Info, text: text.to_string() }
    }

    #[test]
    fn shows_one_at_a_time_in_fifo_order() {
        let t0 = Instant::now();
        let mut q = ToastQueue::with_duration(Duration::from_millis(100));
        q.push(toast("first"));
        q.push(toast("second"));
        q.push(toast("third"));

        q.tick(t0);
        assert_eq!(q.visible().unwrap().text, "first");

        // Still inside the first toast's window: second stays queued.
        q.tick(t0 + Duration::from_millis(50));
        assert_eq!(q.visible().unwrap().text, "first");

        q.tick(t0 + Duration::from_millis(100));
        assert_eq!(q.visible().unwrap().text, "second");

        q.tick(t0 + Duration::from_millis(200));
        assert_eq!(q.visible().unwrap().text, "third");

        q.tick(t0 + Duration::from_millis(300));
        assert!(q.visible().is_none());
        assert!(q.is_idle());
    }

    #[test]
    fn empty_queue_ticks_to_nothing() {
        let mut q = ToastQueue::new();
        q.tick(Instant::now());
        assert!(q.visible().is_none());
    }
}
