use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

use crate::ui::Term;

// (text, per-char delay ms, pause after ms)
const SEQUENCES: &[(&str, u64, u64)] = &[
    ("V0IDRUNNER DECK BIOS v3.1\nMEM CHECK: 640K OK (should be enough)\nICE DETECTOR: offline\nNEURAL LINK: simulated", 14, 900),
    (">mount /dev/persona\n>decrypt dossier.enc --key=visitor\n>spinning up overlays", 22, 900),
    ("UPLINK ESTABLISHED\nWELCOME, OPERATOR", 40, 700),
];

/// Typewriter boot crawl. Space/Enter/Esc skips the rest.
pub fn bootup(terminal: &mut Term, fg: Color) -> Result<()> {
    let mut displayed: Vec<String> = Vec::new();

    'outer: for (text, char_delay_ms, pause_ms) in SEQUENCES {
        displayed.clear();
        for line in text.lines() {
            let mut built = String::new();
            for ch in line.chars() {
                built.push(ch);
                let mut frame_lines = displayed.clone();
                frame_lines.push(built.clone());
                terminal.draw(|f| draw_boot(f, &frame_lines, fg))?;
                if check_skip()? {
                    break 'outer;
                }
                std::thread::sleep(Duration::from_millis(*char_delay_ms));
            }
            displayed.push(built);
        }

        let pause_steps = pause_ms / 50;
        for _ in 0..pause_steps {
            terminal.draw(|f| draw_boot(f, &displayed, fg))?;
            if check_skip()? {
                break 'outer;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    Ok(())
}

fn draw_boot(f: &mut Frame, lines: &[String], fg: Color) {
    let size = f.area();
    let style = Style::default().fg(fg);
    let text: Vec<Line> = lines
        .iter()
        .map(|l| Line::from(Span::styled(l.as_str(), style)))
        .collect();
    let top = size.height.saturating_sub(lines.len() as u16) / 2;
    let pad = 3u16;
    let area = Rect {
        x: pad,
        y: top,
        width: size.width.saturating_sub(pad * 2),
        height: size.height.saturating_sub(top),
    };
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);

    let hint = Paragraph::new(Span::styled(
        "SPACE to skip",
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Center);
    let hint_area = Rect { x: 0, y: size.height.saturating_sub(1), width: size.width, height: 1 };
    f.render_widget(hint, hint_area);
}

/// Returns true if the user pressed a skip key.
fn check_skip() -> Result<bool> {
    if event::poll(Duration::from_millis(0))? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press
                && matches!(k.code, KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Esc)
            {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
