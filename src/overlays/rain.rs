use crossterm::event::KeyEvent;
use rand::Rng;
use ratatui::{
    layout::Rect,
    style::Color,
    widgets::Paragraph,
    Frame,
};
use std::time::{Duration, Instant};

use crate::core::overlay::{KeyOutcome, Overlay, OverlayCtx};
use crate::core::task::Interval;
use crate::ui::{dim_style, normal_style};

const GLYPHS: &[char] = &[
    'ﾊ', 'ﾐ', 'ﾋ', 'ｰ', 'ｳ', 'ｼ', 'ﾅ', 'ﾓ', 'ﾆ', 'ｻ', 'ﾜ', 'ﾂ', 'ｵ', 'ﾘ',
    '0', '1', '2', '3', '5', '7', '8', '9', 'Z', 'X', ':', '.', '=', '*',
];

const COLUMN_COUNT: usize = 48;
const TRAIL: u16 = 6;

struct Drop {
    col: u16,
    head: i32,
    speed: i32,
}

/// Ambient digital rain. Not a modal: it paints sparse glyphs over whatever
/// is underneath and never takes keys.
pub struct Rain {
    drops: Vec<Drop>,
    step: Interval,
}

impl Rain {
    pub fn new(now: Instant) -> Self {
        let mut rng = rand::thread_rng();
        let drops = (0..COLUMN_COUNT)
            .map(|_| Drop {
                col: rng.gen_range(0..400),
                head: -(rng.gen_range(0..30) as i32),
                speed: rng.gen_range(1..=2),
            })
            .collect();
        Self { drops, step: Interval::immediate(Duration::from_millis(80), now) }
    }
}

impl Overlay for Rain {
    fn title(&self) -> &str {
        "RAIN"
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut OverlayCtx) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn tick(&mut self, now: Instant, _ctx: &mut OverlayCtx) {
        if !self.step.fire(now) {
            return;
        }
        let mut rng = rand::thread_rng();
        for d in &mut self.drops {
            d.head += d.speed;
            if d.head - TRAIL as i32 > 80 {
                d.col = rng.gen_range(0..400);
                d.head = -(rng.gen_range(0..10) as i32);
                d.speed = rng.gen_range(1..=2);
            }
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, theme: Color) {
        let mut rng = rand::thread_rng();
        for d in &self.drops {
            let x = area.x + d.col % area.width.max(1);
            for t in 0..TRAIL {
                let y = d.head - t as i32;
                if y < 0 || y >= area.height as i32 {
                    continue;
                }
                let glyph = GLYPHS[rng.gen_range(0..GLYPHS.len())];
                let style = if t == 0 { normal_style(theme) } else { dim_style(theme) };
                let cell = Rect { x, y: area.y + y as u16, width: 1, height: 1 };
                f.render_widget(Paragraph::new(glyph.to_string()).style(style), cell);
            }
        }
    }
}
