use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, style::Color, Frame};
use std::time::Instant;

use crate::content::HELP_LINES;
use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::ui::{centered, normal_style, panel, render_hint, render_lines};

pub struct Help {
    offset: usize,
}

impl Help {
    pub fn new() -> Self {
        Self { offset: 0 }
    }
}

impl Overlay for Help {
    fn title(&self) -> &str {
        "HELP"
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.offset = self.offset.saturating_sub(1);
                KeyOutcome::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.offset = (self.offset + 1).min(HELP_LINES.len().saturating_sub(1));
                KeyOutcome::Consumed
            }
            KeyCode::Char('q') => KeyOutcome::Close,
            _ => KeyOutcome::Ignored,
        }
    }

    fn tick(&mut self, _now: Instant, _ctx: &mut OverlayCtx) {}

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(area, 56, HELP_LINES.len() as u16 + 3);
        let inner = panel(f, area, self.title(), theme);
        let page: Vec<String> = HELP_LINES
            .iter()
            .skip(self.offset)
            .take(inner.height.saturating_sub(1) as usize)
            .map(|l| l.to_string())
            .collect();
        render_lines(f, inner, &page, normal_style(theme));
        render_hint(f, inner, "j/k scroll · esc close", theme);
    }
}
