use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, style::Color, Frame};
use std::time::Instant;

use crate::core::bus::{open_signal, SIG_CONFETTI};
use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::core::prefs::{DEFAULT_THEME, KEY_MUTED, KEY_THEME};
use crate::ui::{centered, normal_style, panel, render_hint, render_lines, sel_style};

enum Action {
    OpenPanel(&'static str),
    FlipTheme,
    ToggleMute,
    Confetti,
}

const ENTRIES: &[(&str, Action)] = &[
    ("open: console", Action::OpenPanel("console")),
    ("open: help", Action::OpenPanel("help")),
    ("open: minimap", Action::OpenPanel("minimap")),
    ("open: digital rain", Action::OpenPanel("rain")),
    ("open: node scan", Action::OpenPanel("scan")),
    ("open: performance", Action::OpenPanel("perf")),
    ("open: brute force", Action::OpenPanel("bruteforce")),
    ("open: defrag", Action::OpenPanel("defrag")),
    ("theme: flip cyber/green", Action::FlipTheme),
    ("sound: toggle mute", Action::ToggleMute),
    ("celebrate", Action::Confetti),
];

/// Ctrl+K command palette: type to filter, enter to run. Runs everything by
/// re-emitting bus signals or flipping preferences, so it needs no handle on
/// any other widget.
pub struct Palette {
    filter: String,
    selected: usize,
}

impl Palette {
    pub fn new() -> Self {
        Self { filter: String::new(), selected: 0 }
    }

    fn matches(&self) -> Vec<usize> {
        let needle = self.filter.to_ascii_lowercase();
        ENTRIES
            .iter()
            .enumerate()
            .filter(|(_, (label, _))| label.to_ascii_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    fn run(&self, entry: usize, ctx: &mut OverlayCtx) {
        match &ENTRIES[entry].1 {
            Action::OpenPanel(id) => ctx.bus.emit(&open_signal(id), None),
            Action::FlipTheme => {
                let cur = ctx.prefs.get_str(KEY_THEME, DEFAULT_THEME);
                let next = if cur == "cyber" { "green" } else { "cyber" };
                ctx.prefs.set_str(KEY_THEME, next);
            }
            Action::ToggleMute => {
                let muted = ctx.prefs.get_bool(KEY_MUTED, false);
                ctx.prefs.set_bool(KEY_MUTED, !muted);
            }
            Action::Confetti => ctx.bus.emit(SIG_CONFETTI, None),
        }
    }
}

impl Overlay for Palette {
    fn title(&self) -> &str {
        "PALETTE"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut OverlayCtx) -> KeyOutcome {
        let hits = self.matches();
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                KeyOutcome::Consumed
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(hits.len().saturating_sub(1));
                KeyOutcome::Consumed
            }
            KeyCode::Enter => {
                if let Some(&entry) = hits.get(self.selected) {
                    self.run(entry, ctx);
                }
                KeyOutcome::Close
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.selected = 0;
                KeyOutcome::Consumed
            }
            KeyCode::Char(c) if (c as u32) >= 32 => {
                self.filter.push(c);
                self.selected = 0;
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn tick(&mut self, _now: Instant, _ctx: &mut OverlayCtx) {}

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(area, 48, ENTRIES.len() as u16 + 5);
        let inner = panel(f, area, self.title(), theme);
        if inner.height < 2 {
            return;
        }
        let prompt = Rect { height: 1, ..inner };
        render_lines(f, prompt, &[format!("> {}█", self.filter)], normal_style(theme));

        let hits = self.matches();
        for (row, &entry) in hits.iter().enumerate() {
            let y = inner.y + 1 + row as u16;
            if y >= inner.y + inner.height.saturating_sub(1) {
                break;
            }
            let line_area = Rect { y, height: 1, ..inner };
            let (text, style) = if row == self.selected {
                (format!(" > {}", ENTRIES[entry].0), sel_style(theme))
            } else {
                (format!("   {}", ENTRIES[entry].0), normal_style(theme))
            };
            render_lines(f, line_area, &[text], style);
        }
        render_hint(f, inner, "type to filter · enter run · esc close", theme);
    }

    fn wants_text_input(&self) -> bool {
        true
    }
}
