use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, style::Color, Frame};
use std::time::Instant;

use crate::core::achievements;
use crate::core::command::{self, CommandCtx, RapidTracker};
use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::ui::{centered, dim_style, normal_style, panel, render_lines};

const SCROLLBACK_CAP: usize = 200;

/// The in-deck command console. Backtick toggles it; while open it captures
/// all printable keys, so global single-key shortcuts stay quiet.
pub struct Console {
    input: String,
    scrollback: Vec<String>,
    rapid: RapidTracker,
    opened: Instant,
}

impl Console {
    pub fn new(now: Instant) -> Self {
        Self {
            input: String::new(),
            scrollback: vec!["cyberdeck console — type 'help' for commands".to_string()],
            rapid: RapidTracker::new(),
            opened: now,
        }
    }

    fn run_line(&mut self, ctx: &mut OverlayCtx) -> KeyOutcome {
        let line = std::mem::take(&mut self.input);
        self.scrollback.push(format!("> {line}"));

        let now = Instant::now();
        let mut cmd_ctx = CommandCtx {
            bus: ctx.bus,
            prefs: ctx.prefs,
            started: self.opened,
            now,
        };
        let out = command::execute(&line, &mut cmd_ctx);

        if self.rapid.record(now) {
            achievements::unlock(ctx.prefs, ctx.bus, "console_hacker");
        }

        if out.clear {
            self.scrollback.clear();
        }
        self.scrollback.extend(out.lines);
        if self.scrollback.len() > SCROLLBACK_CAP {
            let excess = self.scrollback.len() - SCROLLBACK_CAP;
            self.scrollback.drain(..excess);
        }
        if out.exit {
            KeyOutcome::Close
        } else {
            KeyOutcome::Consumed
        }
    }
}

impl Overlay for Console {
    fn title(&self) -> &str {
        "CONSOLE"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut OverlayCtx) -> KeyOutcome {
        match key.code {
            KeyCode::Enter => self.run_line(ctx),
            KeyCode::Backspace => {
                self.input.pop();
                KeyOutcome::Consumed
            }
            KeyCode::Char(c) if (c as u32) >= 32 => {
                self.input.push(c);
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn tick(&mut self, _now: Instant, _ctx: &mut OverlayCtx) {}

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(
            area,
            area.width.saturating_sub(10).max(40),
            area.height.saturating_sub(6).max(10),
        );
        let inner = panel(f, area, self.title(), theme);
        if inner.height < 2 {
            return;
        }

        let visible = inner.height as usize - 1;
        let start = self.scrollback.len().saturating_sub(visible);
        let tail: Vec<String> = self.scrollback[start..].to_vec();
        let log_area = Rect { height: inner.height - 1, ..inner };
        render_lines(f, log_area, &tail, dim_style(theme));

        let prompt = format!("> {}█", self.input);
        let prompt_area = Rect { y: inner.y + inner.height - 1, height: 1, ..inner };
        render_lines(f, prompt_area, &[prompt], normal_style(theme));
    }

    fn wants_text_input(&self) -> bool {
        true
    }
}
