use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, style::Color, Frame};
use serde_json::json;
use std::time::Instant;

use crate::content::SECTIONS;
use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::ui::{centered, normal_style, panel, render_hint, render_lines, sel_style};

/// Signal the home screen listens on to jump between sections.
pub const SIG_GOTO_SECTION: &str = "goto-section";

pub struct Minimap {
    selected: usize,
}

impl Minimap {
    pub fn new() -> Self {
        Self { selected: 0 }
    }
}

impl Overlay for Minimap {
    fn title(&self) -> &str {
        "MINIMAP"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut OverlayCtx) -> KeyOutcome {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                KeyOutcome::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(SECTIONS.len() - 1);
                KeyOutcome::Consumed
            }
            KeyCode::Enter => {
                ctx.bus.emit(SIG_GOTO_SECTION, Some(&json!(self.selected)));
                KeyOutcome::Close
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn tick(&mut self, _now: Instant, _ctx: &mut OverlayCtx) {}

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(area, 36, SECTIONS.len() as u16 + 4);
        let inner = panel(f, area, self.title(), theme);
        for (i, (_, label)) in SECTIONS.iter().enumerate() {
            if i as u16 >= inner.height.saturating_sub(1) {
                break;
            }
            let row = Rect { y: inner.y + i as u16, height: 1, ..inner };
            let (text, style) = if i == self.selected {
                (format!(" > {label}"), sel_style(theme))
            } else {
                (format!("   {label}"), normal_style(theme))
            };
            render_lines(f, row, &[text], style);
        }
        render_hint(f, inner, "enter jump · esc close", theme);
    }
}
