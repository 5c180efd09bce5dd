use serde_json::json;
use std::time::{Duration, Instant};

use crate::content;
use crate::core::bus::{open_signal, Bus, SIG_CONFETTI, SIG_KERNEL_PANIC};
use crate::core::cipher::{rot, rot13};
use crate::core::prefs::{PrefStore, DEFAULT_THEME, KEY_MUTED, KEY_THEME};

// ── Command surface ───────────────────────────────────────────────────────────
// Line-oriented: the command token is case-insensitive, arguments split off
// at the first whitespace. Toggle commands just re-emit the matching bus
// signal; the console itself never touches another widget.

/// Panels the `open` command may toggle.
pub const OPENABLE: &[&str] = &[
    "help", "minimap", "rain", "scan", "perf", "bruteforce", "defrag", "palette",
];

pub struct CommandCtx<'a> {
    pub bus: &'a Bus,
    pub prefs: &'a mut PrefStore,
    pub started: Instant,
    pub now: Instant,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Output {
    pub lines: Vec<String>,
    pub clear: bool,
    pub exit: bool,
}

impl Output {
    fn lines<I: IntoIterator<Item = S>, S: Into<String>>(lines: I) -> Self {
        Self { lines: lines.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    fn line(s: impl Into<String>) -> Self {
        Self::lines([s.into()])
    }
}

const HELP_TEXT: &[&str] = &[
    "available commands:",
    "  help              this list",
    "  whoami            operator dossier",
    "  skills            loadout",
    "  contact           comm channels",
    "  uptime            session uptime",
    "  theme             flip cyber <-> green",
    "  mute              toggle ui sound",
    "  decrypt <text>    run the rot13 cracker on <text>",
    "  rot <n> <text>    rotate letters by <n>",
    "  open <panel>      toggle a panel (help, minimap, rain, scan,",
    "                    perf, bruteforce, defrag, palette)",
    "  defrag            defragment the deck",
    "  panic             do not run this",
    "  confetti          celebrate",
    "  clear             wipe the scrollback",
    "  exit              close the console",
];

pub fn execute(line: &str, ctx: &mut CommandCtx) -> Output {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Output::default();
    }
    let (token, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((t, a)) => (t.to_ascii_lowercase(), a.trim()),
        None => (trimmed.to_ascii_lowercase(), ""),
    };

    match token.as_str() {
        "help" => Output::lines(HELP_TEXT.iter().copied()),
        "whoami" => Output::lines(content::WHOAMI.iter().copied()),
        "skills" => Output::lines(content::SKILLS.iter().copied()),
        "contact" => Output::lines(content::CONTACT.iter().copied()),
        "uptime" => {
            let up = ctx.now.saturating_duration_since(ctx.started);
            Output::line(format!("deck online for {}", fmt_uptime(up)))
        }
        "theme" => {
            let cur = ctx.prefs.get_str(KEY_THEME, DEFAULT_THEME);
            let next = if cur == "cyber" { "green" } else { "cyber" };
            ctx.prefs.set_str(KEY_THEME, next);
            Output::line(format!("theme -> {next}"))
        }
        "mute" => {
            let muted = !ctx.prefs.get_bool(KEY_MUTED, false);
            ctx.prefs.set_bool(KEY_MUTED, muted);
            Output::line(if muted { "sound off" } else { "sound on" })
        }
        "decrypt" => {
            if arg.is_empty() {
                return Output::line("usage: decrypt <text>");
            }
            Output::lines([
                format!("CIPHERTEXT: {arg}"),
                "APPLYING ROT13 BRUTE KEY...".to_string(),
                format!("PLAINTEXT: {}", rot13(arg)),
            ])
        }
        "rot" => match arg.split_once(char::is_whitespace) {
            Some((n, text)) => match n.parse::<u8>() {
                Ok(n) => Output::line(rot(text.trim(), n)),
                Err(_) => Output::line("usage: rot <n> <text>"),
            },
            None => Output::line("usage: rot <n> <text>"),
        },
        "open" => {
            let panel = arg.to_ascii_lowercase();
            if OPENABLE.contains(&panel.as_str()) {
                ctx.bus.emit(&open_signal(&panel), None);
                Output::line(format!("toggling {panel}"))
            } else {
                Output::line(format!("no such panel: {arg}"))
            }
        }
        "defrag" => {
            ctx.bus.emit(&open_signal("defrag"), None);
            Output::line("defragmenting...")
        }
        "panic" => {
            ctx.bus.emit(SIG_KERNEL_PANIC, Some(&json!("console")));
            Output::line("oh no.")
        }
        "confetti" => {
            ctx.bus.emit(SIG_CONFETTI, None);
            Output::line("\\o/")
        }
        "clear" => Output { clear: true, ..Output::default() },
        "exit" | "quit" | "close" => Output { exit: true, ..Output::default() },
        _ => Output::line(format!("command not found: {token}")),
    }
}

fn fmt_uptime(d: Duration) -> String {
    let s = d.as_secs();
    format!("{:02}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60)
}

// ── Rapid-entry tracking ──────────────────────────────────────────────────────
// Novelty threshold, preserved as-is: five commands inside a second and a
// half count as frantic typing.

pub const RAPID_CMD_COUNT: usize = 5;
pub const RAPID_CMD_WINDOW: Duration = Duration::from_millis(1500);

#[derive(Debug, Default)]
pub struct RapidTracker {
    stamps: Vec<Instant>,
}

impl RapidTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one command; true when the burst threshold is crossed.
    pub fn record(&mut self, now: Instant) -> bool {
        self.stamps.push(now);
        self.stamps
            .retain(|t| now.saturating_duration_since(*t) <= RAPID_CMD_WINDOW);
        self.stamps.len() >= RAPID_CMD_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(bus: &'a Bus, prefs: &'a mut PrefStore) -> CommandCtx<'a> {
        let now = Instant::now();
        CommandCtx { bus, prefs, started: now, now }
    }

    #[test]
    fn help_lists_the_vocabulary() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let out = execute("help", &mut ctx(&bus, &mut prefs));
        assert_eq!(out.lines, HELP_TEXT);
        assert!(!out.clear && !out.exit);
    }

    #[test]
    fn command_token_is_case_insensitive() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let lower = execute("whoami", &mut ctx(&bus, &mut prefs));
        let upper = execute("WHOAMI", &mut ctx(&bus, &mut prefs));
        assert_eq!(lower, upper);
        assert!(!lower.lines.is_empty());
    }

    #[test]
    fn theme_flips_between_cyber_and_green() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        assert_eq!(prefs.get_str(KEY_THEME, DEFAULT_THEME), "cyber");

        execute("theme", &mut ctx(&bus, &mut prefs));
        assert_eq!(prefs.get_str(KEY_THEME, DEFAULT_THEME), "green");

        execute("theme", &mut ctx(&bus, &mut prefs));
        assert_eq!(prefs.get_str(KEY_THEME, DEFAULT_THEME), "cyber");
    }

    #[test]
    fn decrypt_prints_three_lines_ending_in_the_input() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let out = execute("decrypt hello", &mut ctx(&bus, &mut prefs));
        assert_eq!(out.lines.len(), 3);
        assert!(out.lines.iter().any(|l| l.ends_with("hello")));
        // rot13 of "hello"
        assert!(out.lines[2].ends_with("uryyb"));
    }

    #[test]
    fn unknown_command_reports_not_found() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let out = execute("unknowncmd123", &mut ctx(&bus, &mut prefs));
        assert_eq!(out.lines, vec!["command not found: unknowncmd123"]);
    }

    #[test]
    fn open_reemits_the_panel_signal() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let hits = Rc::new(RefCell::new(0u32));
        let h = hits.clone();
        let _sub = bus.subscribe(&open_signal("rain"), move |_| *h.borrow_mut() += 1);

        execute("open rain", &mut ctx(&bus, &mut prefs));
        execute("open RAIN", &mut ctx(&bus, &mut prefs));
        execute("open nonsense", &mut ctx(&bus, &mut prefs));
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn args_split_on_first_whitespace_only() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let out = execute("rot 13 hello world", &mut ctx(&bus, &mut prefs));
        assert_eq!(out.lines, vec!["uryyb jbeyq"]);
    }

    #[test]
    fn blank_input_produces_nothing() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let out = execute("   ", &mut ctx(&bus, &mut prefs));
        assert!(out.lines.is_empty());
    }

    #[test]
    fn rapid_tracker_needs_five_inside_the_window() {
        let t0 = Instant::now();
        let mut rt = RapidTracker::new();
        for i in 0..4 {
            assert!(!rt.record(t0 + Duration::from_millis(i * 100)));
        }
        assert!(rt.record(t0 + Duration::from_millis(400)));

        // Spread out: never five in the window.
        let mut slow = RapidTracker::new();
        for i in 0..10 {
            assert!(!slow.record(t0 + Duration::from_millis(i * 600)));
        }
    }
}
