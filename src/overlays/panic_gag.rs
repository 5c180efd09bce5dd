use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};

const DWELL: Duration = Duration::from_millis(3500);

const PANIC_TEXT: &[&str] = &[
    "KERNEL PANIC — not syncing: operator poked the wrong thing",
    "",
    "CPU: 0 PID: 1337 Comm: cyberdeck Tainted: G        WTF",
    "Call Trace:",
    "  <TASK>",
    "  do_mischief+0x42/0x1337",
    "  handle_console_command+0xbad/0xc0de",
    "  ? user_was_warned+0x1/0x1",
    "  </TASK>",
    "",
    "(relax — it dismisses itself)",
];

/// Full-screen kernel-panic gag. Pure theater: shows for a few seconds,
/// any key or the dwell timer dismisses it.
pub struct PanicGag {
    shown_at: Instant,
    dismissed: bool,
}

impl PanicGag {
    pub fn new(now: Instant) -> Self {
        Self { shown_at: now, dismissed: false }
    }
}

impl Overlay for PanicGag {
    fn title(&self) -> &str {
        "PANIC"
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
        KeyOutcome::Close
    }

    fn tick(&mut self, now: Instant, _ctx: &mut OverlayCtx) {
        if now.duration_since(self.shown_at) >= DWELL {
            self.dismissed = true;
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, _theme: Color) {
        // Always red, whatever the theme. It's a panic.
        let style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        f.render_widget(Clear, area);
        let lines: Vec<Line> = PANIC_TEXT
            .iter()
            .map(|l| Line::from(Span::styled(*l, style)))
            .collect();
        let top = area.y + area.height.saturating_sub(PANIC_TEXT.len() as u16) / 2;
        let body = Rect {
            x: area.x,
            y: top,
            width: area.width,
            height: area.height.saturating_sub(top - area.y),
        };
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
    }

    fn finished(&self) -> bool {
        self.dismissed
    }
}
