use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, style::Color, Frame};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::core::bus::{open_signal, Bus, Subscription};
use crate::core::prefs::PrefStore;

// ── Overlay contract ──────────────────────────────────────────────────────────

/// What a key press did inside an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Overlay didn't care; the host may interpret the key globally.
    Ignored,
    /// Overlay handled it.
    Consumed,
    /// Overlay handled it and wants to close.
    Close,
}

/// Shared services an overlay may touch while open.
pub struct OverlayCtx<'a> {
    pub bus: &'a Bus,
    pub prefs: &'a mut PrefStore,
}

/// A self-contained toggleable panel. Exactly two externally visible states,
/// closed and open; an open overlay is a live instance, a closed one is no
/// instance at all. That makes reset-on-close structural: closing drops the
/// value along with its intervals and subscriptions, and reopening builds a
/// fresh default from the factory.
pub trait Overlay {
    fn title(&self) -> &str;

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut OverlayCtx) -> KeyOutcome;

    /// Advance internal timers. Called on every app tick while open.
    fn tick(&mut self, now: Instant, ctx: &mut OverlayCtx);

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color);

    /// While true, the host withholds bare-letter global shortcuts so typing
    /// doesn't toggle unrelated panels.
    fn wants_text_input(&self) -> bool {
        false
    }

    /// Completion-condition variants return true to close themselves.
    fn finished(&self) -> bool {
        false
    }
}

pub type Factory = Box<dyn Fn(Instant) -> Box<dyn Overlay>>;

// ── Key chords ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub code: KeyCode,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn bare(c: char) -> Self {
        Self { code: KeyCode::Char(c), ctrl: false, shift: false }
    }

    pub fn ctrl(c: char) -> Self {
        Self { code: KeyCode::Char(c), ctrl: true, shift: false }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let code_matches = match (self.code, key.code) {
            // Letters match case-insensitively so `M` works without shift.
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        code_matches && ctrl == self.ctrl && (!self.shift || shift)
    }

    /// A chord that types a visible character when a text field is focused.
    fn is_typable(&self) -> bool {
        !self.ctrl && matches!(self.code, KeyCode::Char(_))
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

struct Entry {
    id: &'static str,
    chord: Option<KeyChord>,
    factory: Factory,
    live: Option<Box<dyn Overlay>>,
    crashed: bool,
    // Held for its Drop: unmounting the entry deregisters the trigger.
    _trigger: Option<Subscription>,
}

/// Owns every registered overlay: trigger routing, the open stack, and the
/// open/close lifecycle. Widgets never see each other; they only share the
/// bus and the preference store through `OverlayCtx`.
pub struct OverlayHost {
    entries: Vec<Entry>,
    stack: Vec<&'static str>,
    pending: Rc<RefCell<Vec<String>>>,
}

impl OverlayHost {
    pub fn new() -> Self {
        Self { entries: Vec::new(), stack: Vec::new(), pending: Rc::new(RefCell::new(Vec::new())) }
    }

    /// Register an overlay with its trigger sources: an optional global key
    /// chord and a bus signal `open-<id>`. Both live only while the entry is
    /// mounted in this host.
    pub fn register(
        &mut self,
        id: &'static str,
        chord: Option<KeyChord>,
        bus: &Bus,
        factory: Factory,
    ) {
        let pending = Rc::downgrade(&self.pending);
        let signal = open_signal(id);
        let trigger = bus.subscribe(&signal, move |_| {
            if let Some(p) = pending.upgrade() {
                p.borrow_mut().push(id.to_string());
            }
        });
        self.entries.push(Entry { id, chord, factory, live: None, crashed: false, _trigger: Some(trigger) });
    }

    /// Remove an overlay entirely: close it and drop its triggers.
    pub fn unmount(&mut self, id: &str) {
        self.close(id);
        self.entries.retain(|e| e.id != id);
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id && e.live.is_some())
    }

    pub fn open_count(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> Option<&'static str> {
        self.stack.last().copied()
    }

    pub fn open(&mut self, id: &str, now: Instant) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else { return };
        // Idempotent: a second trigger on an open overlay is a no-op, so
        // there is never more than one live instance per id.
        if entry.live.is_some() {
            return;
        }
        entry.live = Some((entry.factory)(now));
        entry.crashed = false;
        self.stack.push(entry.id);
    }

    pub fn close(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.live = None;
        }
        self.stack.retain(|s| *s != id);
    }

    pub fn toggle(&mut self, id: &str, now: Instant) {
        if self.is_open(id) {
            self.close(id);
        } else {
            self.open(id, now);
        }
    }

    pub fn close_top(&mut self) -> bool {
        match self.stack.last().copied() {
            Some(id) => {
                self.close(id);
                true
            }
            None => false,
        }
    }

    /// Apply toggles requested over the bus since the last drain.
    pub fn drain_signals(&mut self, now: Instant) {
        let ids: Vec<String> = self.pending.borrow_mut().drain(..).collect();
        for id in ids {
            self.toggle(&id, now);
        }
    }

    /// True while the focused (topmost) overlay is capturing text.
    pub fn text_input_active(&self) -> bool {
        self.top()
            .and_then(|id| self.entries.iter().find(|e| e.id == id))
            .and_then(|e| e.live.as_ref())
            .is_some_and(|o| o.wants_text_input())
    }

    /// Route a key press: the focused overlay gets first refusal, Escape
    /// closes the top, and otherwise chords toggle — except that bare
    /// typable chords are withheld while a text field is focused.
    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut OverlayCtx, now: Instant) -> bool {
        if let Some(top_id) = self.top() {
            let outcome = self
                .entries
                .iter_mut()
                .find(|e| e.id == top_id)
                .and_then(|e| e.live.as_mut())
                .map(|o| o.handle_key(key, ctx))
                .unwrap_or(KeyOutcome::Ignored);
            match outcome {
                KeyOutcome::Close => {
                    self.close(top_id);
                    return true;
                }
                KeyOutcome::Consumed => return true,
                KeyOutcome::Ignored => {}
            }
            if key.code == KeyCode::Esc {
                self.close(top_id);
                return true;
            }
        }

        let guard = self.text_input_active();
        let hit = self
            .entries
            .iter()
            .find(|e| e.chord.is_some_and(|c| c.matches(&key) && !(guard && c.is_typable())))
            .map(|e| e.id);
        if let Some(id) = hit {
            self.toggle(id, now);
            return true;
        }
        false
    }

    /// Tick every open overlay, then reap completion-condition closes.
    pub fn tick(&mut self, now: Instant, ctx: &mut OverlayCtx) {
        let mut finished: Vec<&'static str> = Vec::new();
        for entry in &mut self.entries {
            if let Some(live) = entry.live.as_mut() {
                live.tick(now, ctx);
                if live.finished() {
                    finished.push(entry.id);
                }
            }
        }
        for id in finished {
            self.close(id);
        }
    }

    /// Render open overlays bottom-up so the focused one paints last. A
    /// panicking widget is contained: it gets swapped for a small fallback
    /// panel instead of taking the whole frame down.
    pub fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        for id in self.stack.clone() {
            let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else { continue };
            if entry.crashed {
                render_crash_panel(f, area, entry.id, theme);
                continue;
            }
            if let Some(live) = entry.live.as_mut() {
                let ok = catch_unwind(AssertUnwindSafe(|| live.render(f, area, theme))).is_ok();
                if !ok {
                    entry.crashed = true;
                    render_crash_panel(f, area, entry.id, theme);
                }
            }
        }
    }
}

impl Default for OverlayHost {
    fn default() -> Self {
        Self::new()
    }
}

fn render_crash_panel(f: &mut Frame, area: Rect, id: &str, theme: Color) {
    let box_area = crate::ui::centered(area, 44, 5);
    let inner = crate::ui::panel(f, box_area, "FAULT", theme);
    crate::ui::render_lines(
        f,
        inner,
        &[
            format!("the {id} panel broke"),
            "press esc to dismiss it".to_string(),
        ],
        crate::ui::normal_style(theme),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bus::open_signal;

    struct Probe {
        ticks: u32,
        capture_text: bool,
    }

    impl Overlay for Probe {
        fn title(&self) -> &str {
            "probe"
        }
        fn handle_key(&mut self, key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
            if self.capture_text {
                if let KeyCode::Char(_) = key.code {
                    return KeyOutcome::Consumed;
                }
            }
            KeyOutcome::Ignored
        }
        fn tick(&mut self, _now: Instant, _ctx: &mut OverlayCtx) {
            self.ticks += 1;
        }
        fn render(&mut self, _f: &mut Frame, _area: Rect, _theme: Color) {}
        fn wants_text_input(&self) -> bool {
            self.capture_text
        }
    }

    fn probe_factory(capture_text: bool) -> Factory {
        Box::new(move |_| Box::new(Probe { ticks: 0, capture_text }))
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn host_with(bus: &Bus, id: &'static str, chord: Option<KeyChord>, text: bool) -> OverlayHost {
        let mut host = OverlayHost::new();
        host.register(id, chord, bus, probe_factory(text));
        host
    }

    fn ctx_parts() -> (Bus, PrefStore) {
        (Bus::new(), PrefStore::in_memory())
    }

    #[test]
    fn double_open_keeps_a_single_instance() {
        let (bus, mut prefs) = ctx_parts();
        let mut host = host_with(&bus, "probe", None, false);
        let t0 = Instant::now();

        host.open("probe", t0);
        let mut ctx = OverlayCtx { bus: &bus, prefs: &mut prefs };
        host.tick(t0, &mut ctx);
        host.tick(t0, &mut ctx);

        host.open("probe", t0);
        assert_eq!(host.open_count(), 1);

        // One more tick after the duplicate open: still one internal loop,
        // so the tick count advances by exactly one.
        host.tick(t0, &mut ctx);
        host.handle_key(key('x'), &mut ctx, t0);
        // Instance survived the duplicate open (state not reset).
        assert!(host.is_open("probe"));
    }

    #[test]
    fn reopen_resets_internal_state_every_cycle() {
        let (bus, mut prefs) = ctx_parts();
        let mut host = OverlayHost::new();
        let counter = Rc::new(RefCell::new(Vec::<u32>::new()));

        struct Counting {
            progress: Rc<RefCell<u32>>,
        }
        impl Overlay for Counting {
            fn title(&self) -> &str {
                "counting"
            }
            fn handle_key(&mut self, _k: KeyEvent, _c: &mut OverlayCtx) -> KeyOutcome {
                KeyOutcome::Ignored
            }
            fn tick(&mut self, _now: Instant, _ctx: &mut OverlayCtx) {
                *self.progress.borrow_mut() += 1;
            }
            fn render(&mut self, _f: &mut Frame, _area: Rect, _theme: Color) {}
        }

        let snapshots = counter.clone();
        host.register(
            "counting",
            None,
            &bus,
            Box::new(move |_| {
                // Every open starts from zero progress.
                snapshots.borrow_mut().push(0);
                Box::new(Counting { progress: Rc::new(RefCell::new(0)) })
            }),
        );

        let t0 = Instant::now();
        let mut ctx = OverlayCtx { bus: &bus, prefs: &mut prefs };
        for _ in 0..5 {
            host.open("counting", t0);
            host.tick(t0, &mut ctx);
            host.tick(t0, &mut ctx);
            host.close("counting");
        }
        // Five opens, five fresh default states.
        assert_eq!(counter.borrow().len(), 5);
        assert_eq!(host.open_count(), 0);
    }

    #[test]
    fn bus_signal_toggles_and_unmount_deregisters() {
        let (bus, mut prefs) = ctx_parts();
        let mut host = host_with(&bus, "probe", None, false);
        let t0 = Instant::now();

        bus.emit(&open_signal("probe"), None);
        host.drain_signals(t0);
        assert!(host.is_open("probe"));

        bus.emit(&open_signal("probe"), None);
        host.drain_signals(t0);
        assert!(!host.is_open("probe"));

        // After unmount the trigger is gone: emitting again has no effect.
        host.unmount("probe");
        bus.emit(&open_signal("probe"), None);
        host.drain_signals(t0);
        assert!(!host.is_open("probe"));
        assert_eq!(host.open_count(), 0);
        let mut ctx = OverlayCtx { bus: &bus, prefs: &mut prefs };
        assert!(!host.handle_key(key('x'), &mut ctx, t0));
    }

    #[test]
    fn chord_toggles_unless_text_input_focused() {
        let (bus, mut prefs) = ctx_parts();
        let mut host = OverlayHost::new();
        host.register("console", Some(KeyChord::bare('`')), &bus, probe_factory(true));
        host.register("minimap", Some(KeyChord::bare('m')), &bus, probe_factory(false));
        let t0 = Instant::now();
        let mut ctx = OverlayCtx { bus: &bus, prefs: &mut prefs };

        // Focus elsewhere: backtick toggles the console open.
        assert!(host.handle_key(key('`'), &mut ctx, t0));
        assert!(host.is_open("console"));

        // Console captures text: 'm' types into it instead of opening the
        // minimap, and '`' types instead of closing the console.
        assert!(host.handle_key(key('m'), &mut ctx, t0));
        assert!(!host.is_open("minimap"));
        assert!(host.handle_key(key('`'), &mut ctx, t0));
        assert!(host.is_open("console"));

        // Escape always closes the focused overlay.
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(host.handle_key(esc, &mut ctx, t0));
        assert!(!host.is_open("console"));

        // With the guard gone, bare chords work again.
        assert!(host.handle_key(key('m'), &mut ctx, t0));
        assert!(host.is_open("minimap"));
    }

    #[test]
    fn ctrl_chords_pass_the_text_guard() {
        let (bus, mut prefs) = ctx_parts();
        let mut host = OverlayHost::new();
        host.register("console", Some(KeyChord::bare('`')), &bus, probe_factory(true));
        host.register("palette", Some(KeyChord::ctrl('k')), &bus, probe_factory(false));
        let t0 = Instant::now();
        let mut ctx = OverlayCtx { bus: &bus, prefs: &mut prefs };

        host.open("console", t0);
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert!(host.handle_key(ctrl_k, &mut ctx, t0));
        assert!(host.is_open("palette"));
    }

    #[test]
    fn finished_overlay_is_reaped_on_tick() {
        let (bus, mut prefs) = ctx_parts();
        let mut host = OverlayHost::new();

        struct OneShot;
        impl Overlay for OneShot {
            fn title(&self) -> &str {
                "oneshot"
            }
            fn handle_key(&mut self, _k: KeyEvent, _c: &mut OverlayCtx) -> KeyOutcome {
                KeyOutcome::Ignored
            }
            fn tick(&mut self, _now: Instant, _ctx: &mut OverlayCtx) {}
            fn render(&mut self, _f: &mut Frame, _area: Rect, _theme: Color) {}
            fn finished(&self) -> bool {
                true
            }
        }

        host.register("oneshot", None, &bus, Box::new(|_| Box::new(OneShot)));
        let t0 = Instant::now();
        host.open("oneshot", t0);
        assert!(host.is_open("oneshot"));

        let mut ctx = OverlayCtx { bus: &bus, prefs: &mut prefs };
        host.tick(t0, &mut ctx);
        assert!(!host.is_open("oneshot"));
    }
}
