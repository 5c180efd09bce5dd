use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::ui::sel_style;

// ── Cached battery read ───────────────────────────────────────────────────────
// No battery file, no segment — the bar just renders without it.

struct BattCache {
    pct: Option<f32>,
    ts: Instant,
}
static BATT: Mutex<Option<BattCache>> = Mutex::new(None);

fn battery_pct() -> Option<f32> {
    let mut guard = BATT.lock().ok()?;
    if guard.as_ref().map_or(true, |c| c.ts.elapsed() > Duration::from_secs(30)) {
        let pct = read_battery_linux();
        *guard = Some(BattCache { pct, ts: Instant::now() });
    }
    guard.as_ref().and_then(|c| c.pct)
}

fn read_battery_linux() -> Option<f32> {
    for entry in std::fs::read_dir("/sys/class/power_supply").ok()? {
        let path = entry.ok()?.path();
        let kind = std::fs::read_to_string(path.join("type")).ok()?;
        if kind.trim() == "Battery" {
            let cap = std::fs::read_to_string(path.join("capacity")).ok()?;
            return cap.trim().parse().ok();
        }
    }
    None
}

// ── Status bar ────────────────────────────────────────────────────────────────

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    fg: ratatui::style::Color,
    visits: u64,
    streak: u64,
) {
    if area.height == 0 {
        return;
    }

    let now = format!(
        "{} · {}",
        crate::content::HANDLE,
        Local::now().format("%a %d %b %H:%M")
    );
    let mut right = format!("visit #{visits}");
    if streak > 1 {
        right.push_str(&format!(" · streak {streak}d"));
    }
    if let Some(p) = battery_pct() {
        right.push_str(&format!(" · {p:.0}%"));
    }

    let style = sel_style(fg);
    let left = Span::styled(format!(" {now}"), style);
    let used = 1 + now.len() + right.len() + 1;
    let pad = " ".repeat((area.width as usize).saturating_sub(used));
    let line = Line::from(vec![left, Span::styled(pad, style), Span::styled(format!("{right} "), style)]);
    f.render_widget(Paragraph::new(line), area);
}
