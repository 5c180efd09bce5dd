use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

pub type Term = Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>;

// ── Padding ───────────────────────────────────────────────────────────────────
// Horizontal padding applied to every screen so text never touches the edges.
const H_PAD: u16 = 3;

/// Shrink a rect by H_PAD columns on each side.
pub fn pad_horizontal(area: Rect) -> Rect {
    let pad = H_PAD.min(area.width / 2);
    Rect {
        x: area.x + pad,
        y: area.y,
        width: area.width.saturating_sub(pad * 2),
        height: area.height,
    }
}

/// A w×h rect centered in `area`, clamped to fit.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

// ── Color helpers ─────────────────────────────────────────────────────────────

pub fn normal_style(fg: Color) -> Style {
    Style::default().fg(fg)
}
pub fn sel_style(fg: Color) -> Style {
    Style::default().fg(Color::Black).bg(fg).add_modifier(Modifier::BOLD)
}
pub fn title_style(fg: Color) -> Style {
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}
pub fn dim_style(fg: Color) -> Style {
    Style::default().fg(fg).add_modifier(Modifier::DIM)
}

// ── Panel chrome ──────────────────────────────────────────────────────────────

/// Clear a region and draw the standard overlay frame; returns the inner
/// rect to render content into.
pub fn panel(f: &mut Frame, area: Rect, title: &str, fg: Color) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(normal_style(fg))
        .title(Span::styled(format!(" {title} "), title_style(fg)));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    inner
}

pub fn render_lines(f: &mut Frame, area: Rect, lines: &[String], style: Style) {
    let text: Vec<Line> = lines
        .iter()
        .map(|l| Line::from(Span::styled(l.as_str(), style)))
        .collect();
    f.render_widget(Paragraph::new(text), area);
}

/// One-line hint at the bottom of a panel.
pub fn render_hint(f: &mut Frame, area: Rect, hint: &str, fg: Color) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height - 1;
    let p = Paragraph::new(Span::styled(hint, dim_style(fg))).alignment(Alignment::Center);
    f.render_widget(p, Rect { x: area.x, y, width: area.width, height: 1 });
}
