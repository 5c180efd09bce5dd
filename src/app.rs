use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::config::theme_color;
use crate::content;
use crate::core::achievements::{self, by_id};
use crate::core::bus::{Bus, Subscription, SIG_ACHIEVEMENT, SIG_CONFETTI, SIG_KERNEL_PANIC};
use crate::core::overlay::{OverlayCtx, OverlayHost};
use crate::core::prefs::{self, PrefStore, Visit, DEFAULT_THEME, KEY_MUTED, KEY_THEME};
use crate::core::toast::{Toast, ToastKind, ToastQueue};
use crate::overlays::{self, SIG_GOTO_SECTION};
use crate::sound::{self, Beep};
use crate::status::render_status_bar;
use crate::ui::{dim_style, normal_style, pad_horizontal, title_style, Term};

// Novelty thresholds, verbatim from the original behavior.
const STREAK_DAYS: u64 = 3;
const NIGHT_OWL_FROM: u32 = 0;
const NIGHT_OWL_UNTIL: u32 = 5;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ── Bus inbox ─────────────────────────────────────────────────────────────────
// The app's own subscriptions park events here; the loop drains them next
// pass. Handlers hold a Weak so a dropped App leaves no live listeners.

enum AppEvent {
    Achievement(String),
    Confetti,
    KernelPanic,
    GotoSection(usize),
}

type Inbox = Rc<RefCell<Vec<AppEvent>>>;

fn park(inbox: &Weak<RefCell<Vec<AppEvent>>>, ev: AppEvent) {
    if let Some(inbox) = inbox.upgrade() {
        inbox.borrow_mut().push(ev);
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    bus: Bus,
    prefs: PrefStore,
    host: OverlayHost,
    toasts: ToastQueue,
    inbox: Inbox,
    _subs: Vec<Subscription>,
    home_lines: Vec<Line<'static>>,
    section_offsets: Vec<usize>,
    scroll: usize,
    visit: Visit,
    started: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(bus: Bus, mut prefs: PrefStore) -> Self {
        let now = Instant::now();
        let today = chrono::Local::now().date_naive();
        let visit = prefs::record_visit(&mut prefs, today);

        let mut host = OverlayHost::new();
        overlays::mount_all(&mut host, &bus);

        let inbox: Inbox = Rc::new(RefCell::new(Vec::new()));
        let subs = vec![
            bus.subscribe(SIG_ACHIEVEMENT, {
                let inbox = Rc::downgrade(&inbox);
                move |d| {
                    let id = d.and_then(|v| v.as_str()).unwrap_or_default().to_string();
                    park(&inbox, AppEvent::Achievement(id));
                }
            }),
            bus.subscribe(SIG_CONFETTI, {
                let inbox = Rc::downgrade(&inbox);
                move |_| park(&inbox, AppEvent::Confetti)
            }),
            bus.subscribe(SIG_KERNEL_PANIC, {
                let inbox = Rc::downgrade(&inbox);
                move |_| park(&inbox, AppEvent::KernelPanic)
            }),
            bus.subscribe(SIG_GOTO_SECTION, {
                let inbox = Rc::downgrade(&inbox);
                move |d| {
                    if let Some(idx) = d.and_then(|v| v.as_u64()) {
                        park(&inbox, AppEvent::GotoSection(idx as usize));
                    }
                }
            }),
        ];

        let (home_lines, section_offsets) = build_home();

        let mut app = Self {
            bus,
            prefs,
            host,
            toasts: ToastQueue::new(),
            inbox,
            _subs: subs,
            home_lines,
            section_offsets,
            scroll: 0,
            visit,
            started: now,
            should_quit: false,
        };
        app.startup_achievements();
        app
    }

    fn startup_achievements(&mut self) {
        achievements::unlock(&mut self.prefs, &self.bus, "first_boot");
        if self.visit.streak >= STREAK_DAYS {
            achievements::unlock(&mut self.prefs, &self.bus, "streak_3");
        }
        use chrono::Timelike;
        let hour = chrono::Local::now().hour();
        if (NIGHT_OWL_FROM..NIGHT_OWL_UNTIL).contains(&hour) {
            achievements::unlock(&mut self.prefs, &self.bus, "night_owl");
        }
    }

    pub fn theme(&self) -> ratatui::style::Color {
        theme_color(&self.prefs.get_str(KEY_THEME, DEFAULT_THEME))
    }

    fn muted(&self) -> bool {
        self.prefs.get_bool(KEY_MUTED, false)
    }

    // ── Main loop ────────────────────────────────────────────────────────────

    pub fn run(&mut self, terminal: &mut Term) -> Result<()> {
        while !self.should_quit {
            let now = Instant::now();

            self.host.drain_signals(now);
            self.drain_inbox(now);
            {
                let mut ctx = OverlayCtx { bus: &self.bus, prefs: &mut self.prefs };
                self.host.tick(now, &mut ctx);
            }
            self.toasts.tick(now);

            let theme = self.theme();
            terminal.draw(|f| self.render(f, theme))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key, Instant::now());
                    }
                }
            }
        }
        Ok(())
    }

    fn drain_inbox(&mut self, now: Instant) {
        let events: Vec<AppEvent> = self.inbox.borrow_mut().drain(..).collect();
        for ev in events {
            match ev {
                AppEvent::Achievement(id) => {
                    let text = by_id(&id)
                        .map(|a| format!("{} — {}", a.title, a.description))
                        .unwrap_or(id);
                    self.toasts.push(Toast { kind: ToastKind::Achievement, text });
                    sound::play(Beep::Unlock, self.muted());
                }
                AppEvent::Confetti => {
                    self.toasts.push(Toast {
                        kind: ToastKind::Confetti,
                        text: "*** \\o/ CONFETTI \\o/ ***".to_string(),
                    });
                }
                AppEvent::KernelPanic => {
                    self.host.open("panic", now);
                    sound::play(Beep::Error, self.muted());
                }
                AppEvent::GotoSection(idx) => {
                    if let Some(&off) = self.section_offsets.get(idx) {
                        self.scroll = off;
                    }
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let handled = {
            let mut ctx = OverlayCtx { bus: &self.bus, prefs: &mut self.prefs };
            self.host.handle_key(key, &mut ctx, now)
        };
        if handled {
            sound::play(Beep::Navigate, self.muted());
            return;
        }

        match key.code {
            // Quit is a home-screen key; with a panel up, Esc comes first.
            KeyCode::Char('q') if self.host.open_count() == 0 => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(self.home_lines.len().saturating_sub(1));
            }
            _ => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    fn render(&mut self, f: &mut Frame, theme: ratatui::style::Color) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(f.area());

        self.render_home(f, chunks[0], theme);
        render_status_bar(f, chunks[1], theme, self.visit.count, self.visit.streak);

        self.host.render(f, chunks[0], theme);
        self.render_toast(f, chunks[0], theme);
    }

    fn render_home(&self, f: &mut Frame, area: Rect, theme: ratatui::style::Color) {
        let area = pad_horizontal(area);
        let visible = area.height as usize;
        let page: Vec<Line> = self
            .home_lines
            .iter()
            .skip(self.scroll)
            .take(visible)
            .cloned()
            .collect();
        let styled: Vec<Line> = page
            .into_iter()
            .map(|l| l.style(normal_style(theme)))
            .collect();
        f.render_widget(Paragraph::new(styled), area);

        if area.height > 1 {
            let hint = Paragraph::new(Span::styled(
                "` console · ? help · q quit",
                dim_style(theme),
            ))
            .alignment(Alignment::Right);
            let hint_area = Rect {
                x: area.x,
                y: area.y + area.height - 1,
                width: area.width,
                height: 1,
            };
            f.render_widget(hint, hint_area);
        }
    }

    fn render_toast(&self, f: &mut Frame, area: Rect, theme: ratatui::style::Color) {
        let Some(toast) = self.toasts.visible() else { return };
        let w = (toast.text.len() as u16 + 4).min(area.width);
        let rect = Rect {
            x: area.x + area.width.saturating_sub(w + 1),
            y: area.y + 1,
            width: w,
            height: 3,
        };
        let inner = crate::ui::panel(
            f,
            rect,
            match toast.kind {
                ToastKind::Achievement => "UNLOCKED",
                ToastKind::Confetti => "PARTY",
                ToastKind::Info => "NOTICE",
            },
            theme,
        );
        f.render_widget(
            Paragraph::new(Span::styled(toast.text.clone(), title_style(theme))),
            inner,
        );
    }
}

// ── Home screen content ───────────────────────────────────────────────────────

/// Flatten the portfolio copy into one scrollable column; returns the lines
/// plus the offset each section starts at (for the minimap jumps).
fn build_home() -> (Vec<Line<'static>>, Vec<usize>) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut offsets = Vec::new();

    let push_section = |title: &'static str, body: &[&'static str], offsets: &mut Vec<usize>, lines: &mut Vec<Line<'static>>| {
        offsets.push(lines.len());
        lines.push(Line::from(title));
        lines.push(Line::from("=".repeat(title.len())));
        for l in body {
            lines.push(Line::from(*l));
        }
        lines.push(Line::from(""));
    };

    offsets.push(lines.len());
    for l in content::HERO {
        lines.push(Line::from(*l));
    }
    lines.push(Line::from(content::TAGLINE));
    lines.push(Line::from(""));

    push_section(content::SECTIONS[1].1, content::BIO, &mut offsets, &mut lines);
    push_section(content::SECTIONS[2].1, content::SKILLS, &mut offsets, &mut lines);
    push_section(content::SECTIONS[3].1, content::CONTACT, &mut offsets, &mut lines);

    (lines, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_from_home_but_not_over_an_open_panel() {
        let mut app = App::new(Bus::new(), PrefStore::in_memory());
        let now = Instant::now();

        // Minimap ignores 'q'; it must not fall through to quit.
        app.host.open("minimap", now);
        app.on_key(q(), now);
        assert!(!app.should_quit);

        app.host.close("minimap");
        app.on_key(q(), now);
        assert!(app.should_quit);
    }

    #[test]
    fn home_has_an_offset_per_section() {
        let (lines, offsets) = build_home();
        assert_eq!(offsets.len(), content::SECTIONS.len());
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        assert!(offsets.iter().all(|&o| o < lines.len()));
    }
}
