use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

// ── Well-known signals ────────────────────────────────────────────────────────

pub const SIG_ACHIEVEMENT: &str = "achievement-unlocked";
pub const SIG_CONFETTI: &str = "confetti-burst";
pub const SIG_KERNEL_PANIC: &str = "kernel-panic";

/// Signal an overlay listens on to be toggled remotely (console, palette).
pub fn open_signal(overlay_id: &str) -> String {
    format!("open-{overlay_id}")
}

// ── Bus ───────────────────────────────────────────────────────────────────────

type Handler = Rc<dyn Fn(Option<&Value>)>;

struct Registry {
    next_id: u64,
    handlers: HashMap<String, Vec<(u64, Handler)>>,
}

/// Broadcast pub/sub over named signals. Everything runs on the UI thread;
/// emit is synchronous and fire-and-forget, with zero subscribers a no-op.
///
/// Built as an injectable value rather than a process global so tests and
/// widgets can run against a fresh instance. Cloning shares the registry.
#[derive(Clone)]
pub struct Bus {
    registry: Rc<RefCell<Registry>>,
}

/// RAII guard for a subscription. Dropping it (or calling `cancel`)
/// unsubscribes, so a widget's listeners die with the widget.
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    signal: String,
    id: u64,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry { next_id: 0, handlers: HashMap::new() })),
        }
    }

    pub fn subscribe<F>(&self, signal: &str, handler: F) -> Subscription
    where
        F: Fn(Option<&Value>) + 'static,
    {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers
            .entry(signal.to_string())
            .or_default()
            .push((id, Rc::new(handler)));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            signal: signal.to_string(),
            id,
        }
    }

    /// Invoke every handler registered for `signal`, in registration order.
    /// Handlers are isolated: one panicking handler does not stop the rest.
    /// The handler list is snapshotted first so a handler may subscribe or
    /// emit reentrantly without deadlocking the registry.
    pub fn emit(&self, signal: &str, detail: Option<&Value>) {
        let snapshot: Vec<Handler> = self
            .registry
            .borrow()
            .handlers
            .get(signal)
            .map(|hs| hs.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();
        for handler in snapshot {
            let _ = catch_unwind(AssertUnwindSafe(|| handler(detail)));
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription {
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut reg) = registry.try_borrow_mut() {
                if let Some(hs) = reg.handlers.get_mut(&self.signal) {
                    hs.retain(|(id, _)| *id != self.id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emit_with_no_subscribers_is_a_noop() {
        let bus = Bus::new();
        bus.emit("nobody-home", None);
    }

    #[test]
    fn subscribers_receive_detail_in_registration_order() {
        let bus = Bus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s1 = seen.clone();
        let _a = bus.subscribe("ping", move |d| {
            s1.borrow_mut().push(format!("a:{}", d.unwrap()));
        });
        let s2 = seen.clone();
        let _b = bus.subscribe("ping", move |d| {
            s2.borrow_mut().push(format!("b:{}", d.unwrap()));
        });

        bus.emit("ping", Some(&json!(7)));
        assert_eq!(*seen.borrow(), vec!["a:7".to_string(), "b:7".to_string()]);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let bus = Bus::new();
        let hits = Rc::new(RefCell::new(0u32));

        let h = hits.clone();
        let sub = bus.subscribe("ping", move |_| *h.borrow_mut() += 1);
        bus.emit("ping", None);
        drop(sub);
        bus.emit("ping", None);

        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn cancel_is_equivalent_to_drop() {
        let bus = Bus::new();
        let hits = Rc::new(RefCell::new(0u32));

        let h = hits.clone();
        let sub = bus.subscribe("ping", move |_| *h.borrow_mut() += 1);
        bus.emit("ping", None);
        sub.cancel();
        bus.emit("ping", None);

        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn panicking_handler_does_not_block_later_handlers() {
        let prev = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let bus = Bus::new();
        let hits = Rc::new(RefCell::new(0u32));

        let _bad = bus.subscribe("ping", |_| panic!("handler bug"));
        let h = hits.clone();
        let _good = bus.subscribe("ping", move |_| *h.borrow_mut() += 1);

        bus.emit("ping", None);
        std::panic::set_hook(prev);

        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn signals_are_independent() {
        let bus = Bus::new();
        let hits = Rc::new(RefCell::new(0u32));
        let h = hits.clone();
        let _sub = bus.subscribe("a", move |_| *h.borrow_mut() += 1);
        bus.emit("b", None);
        assert_eq!(*hits.borrow(), 0);
    }
}
