use crossterm::event::KeyEvent;
use rand::Rng;
use ratatui::{layout::Rect, style::Color, Frame};
use std::time::{Duration, Instant};

use crate::content::SECRET_NODES;
use crate::core::achievements;
use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::core::prefs::KEY_SECRETS;
use crate::core::task::Interval;
use crate::ui::{centered, normal_style, panel, render_hint, render_lines};

const SWEEP_STEP_PCT: u16 = 4;
const HIT_CHANCE: f64 = 0.35;

/// Hidden-node sweep. Sweep progress is session state and resets on close;
/// which nodes have ever been found is durable (the discovered-secrets set).
pub struct Scan {
    sweep_pct: u16,
    known: Vec<String>,
    step: Interval,
}

impl Scan {
    pub fn new(now: Instant) -> Self {
        Self {
            sweep_pct: 0,
            known: Vec::new(),
            step: Interval::new(Duration::from_millis(150), now),
        }
    }
}

impl Overlay for Scan {
    fn title(&self) -> &str {
        "NODE SCAN"
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn tick(&mut self, now: Instant, ctx: &mut OverlayCtx) {
        if self.sweep_pct >= 100 || !self.step.fire(now) {
            return;
        }
        self.sweep_pct = (self.sweep_pct + SWEEP_STEP_PCT).min(100);

        let known = ctx.prefs.get_ids(KEY_SECRETS);
        let undiscovered: Vec<&'static str> = SECRET_NODES
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !known.iter().any(|k| k == id))
            .collect();

        let mut rng = rand::thread_rng();
        // The final step always lands a hit so a full sweep is never empty.
        let must_hit = self.sweep_pct >= 100;
        if !undiscovered.is_empty() && (must_hit || rng.gen_bool(HIT_CHANCE)) {
            let id = undiscovered[rng.gen_range(0..undiscovered.len())];
            ctx.prefs.toggle_set(KEY_SECRETS, id);
        }

        self.known = ctx.prefs.get_ids(KEY_SECRETS);
        if self.known.len() >= SECRET_NODES.len() {
            achievements::unlock(ctx.prefs, ctx.bus, "secret_hunter");
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(area, 54, SECRET_NODES.len() as u16 + 7);
        let inner = panel(f, area, self.title(), theme);
        if inner.width < 4 || inner.height < 3 {
            return;
        }

        let bar_w = inner.width.saturating_sub(8) as usize;
        let filled = bar_w * self.sweep_pct as usize / 100;
        let mut lines = vec![format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            ".".repeat(bar_w - filled),
            self.sweep_pct
        )];

        for (id, desc) in SECRET_NODES {
            let mark = if self.known.iter().any(|k| k == id) { "[+]" } else { "[ ]" };
            lines.push(format!("{mark} {desc}"));
        }
        if self.sweep_pct >= 100 {
            lines.push(String::new());
            lines.push("sweep complete".to_string());
        }
        render_lines(f, inner, &lines, normal_style(theme));
        render_hint(f, inner, "esc close", theme);
    }
}
