use crossterm::event::KeyEvent;
use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::{layout::Rect, style::Color, Frame};
use std::time::{Duration, Instant};

use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::core::task::Interval;
use crate::ui::{centered, normal_style, panel, render_hint, render_lines};

const BLOCKS: usize = 240;
const BLOCKS_PER_ROW: usize = 40;
const MOVES_PER_STEP: usize = 3;
const LINGER: Duration = Duration::from_millis(1800);

/// Fake disk defragmenter. A scattering of used blocks compacts toward the
/// front a few blocks per step; at 100% it lingers and closes itself.
pub struct Defrag {
    used: Vec<bool>,
    moved: usize,
    total_moves: usize,
    step: Interval,
    finished_at: Option<Instant>,
}

impl Defrag {
    pub fn new(now: Instant) -> Self {
        let mut rng = rand::thread_rng();
        let mut used = vec![false; BLOCKS];
        let occupied = rng.gen_range(BLOCKS / 3..BLOCKS / 2);
        let mut idxs: Vec<usize> = (0..BLOCKS).collect();
        idxs.shuffle(&mut rng);
        for &i in idxs.iter().take(occupied) {
            used[i] = true;
        }
        let total_moves = Self::fragmented(&used);
        Self {
            used,
            moved: 0,
            total_moves: total_moves.max(1),
            step: Interval::new(Duration::from_millis(100), now),
            finished_at: None,
        }
    }

    /// Used blocks sitting beyond the compacted prefix.
    fn fragmented(used: &[bool]) -> usize {
        let occupied = used.iter().filter(|&&u| u).count();
        used[..occupied].iter().filter(|&&u| !u).count()
    }

    fn progress_pct(&self) -> usize {
        (self.moved * 100 / self.total_moves).min(100)
    }

    fn done(&self) -> bool {
        Self::fragmented(&self.used) == 0
    }
}

impl Overlay for Defrag {
    fn title(&self) -> &str {
        "DEFRAG"
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn tick(&mut self, now: Instant, _ctx: &mut OverlayCtx) {
        if self.done() {
            if self.finished_at.is_none() {
                self.finished_at = Some(now);
            }
            return;
        }
        if !self.step.fire(now) {
            return;
        }
        for _ in 0..MOVES_PER_STEP {
            let Some(hole) = self.used.iter().position(|&u| !u) else { break };
            let Some(tail) = self.used.iter().rposition(|&u| u) else { break };
            if tail <= hole {
                break;
            }
            self.used.swap(hole, tail);
            self.moved += 1;
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let area = centered(
            area,
            BLOCKS_PER_ROW as u16 + 4,
            (BLOCKS / BLOCKS_PER_ROW) as u16 + 6,
        );
        let inner = panel(f, area, self.title(), theme);
        let mut lines: Vec<String> = self
            .used
            .chunks(BLOCKS_PER_ROW)
            .map(|row| row.iter().map(|&u| if u { '▓' } else { '░' }).collect())
            .collect();
        lines.push(String::new());
        lines.push(format!(
            "{}% — {} block(s) relocated",
            self.progress_pct(),
            self.moved
        ));
        if self.done() {
            lines.push("volume optimized".to_string());
        }
        render_lines(f, inner, &lines, normal_style(theme));
        render_hint(f, inner, "esc abort", theme);
    }

    fn finished(&self) -> bool {
        self.finished_at.is_some_and(|t| t.elapsed() >= LINGER)
    }
}
