use crossterm::event::KeyEvent;
use rand::Rng;
use ratatui::{layout::Rect, style::Color, Frame};
use std::time::{Duration, Instant};

use crate::content::CRACK_TARGETS;
use crate::core::achievements;
use crate::core::bus::SIG_CONFETTI;
use crate::core::cipher::Reveal;
use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::core::task::Interval;
use crate::ui::{centered, dim_style, normal_style, panel, render_hint, render_lines};

const LINGER: Duration = Duration::from_millis(2000);

/// Brute-force "cracker": churns junk glyphs until the target string locks
/// in, one character per tick, then lingers briefly and closes itself.
/// Progress always starts at zero — a reopened cracker never remembers.
pub struct BruteForce {
    reveal: Reveal,
    target_len: usize,
    step: Interval,
    finished_at: Option<Instant>,
    celebrated: bool,
}

impl BruteForce {
    pub fn new(now: Instant) -> Self {
        let mut rng = rand::thread_rng();
        let target = CRACK_TARGETS[rng.gen_range(0..CRACK_TARGETS.len())];
        Self {
            reveal: Reveal::new(target),
            target_len: target.chars().count(),
            step: Interval::new(Duration::from_millis(120), now),
            finished_at: None,
            celebrated: false,
        }
    }
}

impl Overlay for BruteForce {
    fn title(&self) -> &str {
        "BRUTE FORCE"
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn tick(&mut self, now: Instant, ctx: &mut OverlayCtx) {
        if self.reveal.done() {
            if !self.celebrated {
                self.celebrated = true;
                self.finished_at = Some(now);
                achievements::unlock(ctx.prefs, ctx.bus, "code_breaker");
                ctx.bus.emit(SIG_CONFETTI, None);
            }
            return;
        }
        if self.step.fire(now) {
            let mut rng = rand::thread_rng();
            self.reveal.tick(&mut rng);
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(area, 60, 10);
        let inner = panel(f, area, self.title(), theme);
        let mut rng = rand::thread_rng();
        let lines = vec![
            format!("target keyspace: {} chars", self.target_len),
            String::new(),
            format!("  {}", self.reveal.frame(&mut rng)),
            String::new(),
            format!("progress: {:>3}%  ticks: {}", self.reveal.progress_pct(), self.reveal.ticks()),
        ];
        render_lines(f, inner, &lines, normal_style(theme));
        if self.reveal.done() {
            let row = Rect {
                y: inner.y + inner.height.saturating_sub(2).max(1),
                height: 1,
                ..inner
            };
            render_lines(f, row, &["KEY ACCEPTED".to_string()], dim_style(theme));
        }
        render_hint(f, inner, "esc abort", theme);
    }

    fn finished(&self) -> bool {
        self.finished_at
            .is_some_and(|t| t.elapsed() >= LINGER)
    }
}
