use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, style::Color, Frame};
use std::time::{Duration, Instant};
use sysinfo::System;

use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::core::task::Interval;
use crate::ui::{centered, normal_style, panel, render_hint, render_lines};

const HISTORY: usize = 30;
const SPARK: &[char] = &[' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Live performance readout: CPU sparkline and memory gauge, sampled once a
/// second while open. The System handle dies with the overlay.
pub struct Perf {
    sys: System,
    cpu_history: Vec<f32>,
    sample: Interval,
}

impl Perf {
    pub fn new(now: Instant) -> Self {
        Self {
            sys: System::new(),
            cpu_history: Vec::new(),
            sample: Interval::immediate(Duration::from_secs(1), now),
        }
    }

    fn sparkline(&self) -> String {
        self.cpu_history
            .iter()
            .map(|&pct| {
                let idx = ((pct / 100.0) * (SPARK.len() - 1) as f32).round() as usize;
                SPARK[idx.min(SPARK.len() - 1)]
            })
            .collect()
    }
}

impl Overlay for Perf {
    fn title(&self) -> &str {
        "PERF"
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn tick(&mut self, now: Instant, _ctx: &mut OverlayCtx) {
        if !self.sample.fire(now) {
            return;
        }
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        self.cpu_history.push(self.sys.global_cpu_usage());
        if self.cpu_history.len() > HISTORY {
            self.cpu_history.remove(0);
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(area, 56, 6);
        let inner = panel(f, area, self.title(), theme);

        let cpu = self.cpu_history.last().copied().unwrap_or(0.0);
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();

        let mut lines = vec![
            format!("cpu  {cpu:>5.1}%  {}", self.sparkline()),
        ];
        // total_memory() is 0 until the first refresh lands.
        if total > 0 {
            let gb = 1024.0 * 1024.0 * 1024.0;
            lines.push(format!(
                "mem  {:>5.1}%  {:.1} / {:.1} GiB",
                used as f64 * 100.0 / total as f64,
                used as f64 / gb,
                total as f64 / gb,
            ));
        }
        render_lines(f, inner, &lines, normal_style(theme));
        render_hint(f, inner, "sampling 1/s · esc close", theme);
    }
}
