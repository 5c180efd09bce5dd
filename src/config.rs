use ratatui::style::Color;
use std::path::PathBuf;

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Per-user data directory. None when the platform offers no config dir;
/// everything that wanted to persist then runs session-only.
pub fn data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cyberdeck"))
}

pub fn prefs_file() -> Option<PathBuf> {
    data_dir().map(|d| d.join("prefs.json"))
}

pub fn crash_log_file() -> Option<PathBuf> {
    data_dir().map(|d| d.join("crash.log"))
}

/// Append a crash note; best-effort, used from the panic path only.
pub fn write_crash_note(note: &str) {
    let Some(path) = crash_log_file() else { return };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    use std::io::Write;
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        let _ = writeln!(f, "[{}] {note}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    }
}

// ── Themes ────────────────────────────────────────────────────────────────────

pub const THEMES: &[(&str, Color)] = &[
    ("cyber", Color::Cyan),
    ("green", Color::Green),
    ("amber", Color::Yellow),
    ("blood", Color::Red),
    ("ghost", Color::White),
];

pub fn theme_color(name: &str) -> Color {
    THEMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .unwrap_or(Color::Cyan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_cyber() {
        assert_eq!(theme_color("cyber"), Color::Cyan);
        assert_eq!(theme_color("green"), Color::Green);
        assert_eq!(theme_color("no-such-theme"), Color::Cyan);
    }
}
