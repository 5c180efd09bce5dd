use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use std::io::stdout;

mod app;
mod boot;
mod config;
mod content;
mod core;
mod overlays;
mod sound;
mod status;
mod ui;

use app::App;
use crate::core::bus::Bus;
use crate::core::prefs::{PrefStore, DEFAULT_THEME, KEY_BOOT, KEY_MUTED, KEY_THEME};
use sound::Beep;
use ui::Term;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(ratatui::Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn run(terminal: &mut Term, show_boot: bool) -> Result<()> {
    let prefs = PrefStore::open_at(config::prefs_file());
    let bus = Bus::new();

    if show_boot && prefs.get_bool(KEY_BOOT, true) {
        let theme = config::theme_color(&prefs.get_str(KEY_THEME, DEFAULT_THEME));
        sound::play(Beep::Boot, prefs.get_bool(KEY_MUTED, false));
        boot::bootup(terminal, theme)?;
    }

    let mut app = App::new(bus, prefs);
    app.run(terminal)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let no_boot = args.iter().any(|a| a == "--no-boot");

    if args.iter().any(|a| a == "--reset") {
        if let Some(path) = config::prefs_file() {
            let _ = std::fs::remove_file(path);
            println!("preferences wiped.");
        }
        return Ok(());
    }

    let mut terminal = init_terminal()?;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run(&mut terminal, !no_boot)
    }));

    // Always restore the terminal, crash or not.
    restore_terminal(&mut terminal).ok();

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(panic) => {
            let note = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            config::write_crash_note(&note);
            eprintln!("cyberdeck crashed: {note}");
            eprintln!("something broke — reload. (a note was left in the config dir)");
            Ok(())
        }
    }
}
