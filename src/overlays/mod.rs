mod bruteforce;
mod console;
mod defrag;
mod help;
mod minimap;
mod palette;
mod panic_gag;
mod perf;
mod rain;
mod scan;

pub use minimap::SIG_GOTO_SECTION;

use crate::core::bus::Bus;
use crate::core::overlay::{KeyChord, OverlayHost};

/// Mount the whole widget set. Each entry is (id, key chord); every id also
/// answers its `open-<id>` bus signal, which is what the console's `open`
/// command and the palette re-emit.
pub fn mount_all(host: &mut OverlayHost, bus: &Bus) {
    host.register("console", Some(KeyChord::bare('`')), bus, Box::new(|now| Box::new(console::Console::new(now))));
    host.register("help", Some(KeyChord::bare('?')), bus, Box::new(|_| Box::new(help::Help::new())));
    host.register("minimap", Some(KeyChord::bare('m')), bus, Box::new(|_| Box::new(minimap::Minimap::new())));
    host.register("rain", Some(KeyChord::bare('r')), bus, Box::new(|now| Box::new(rain::Rain::new(now))));
    host.register("scan", Some(KeyChord::bare('g')), bus, Box::new(|now| Box::new(scan::Scan::new(now))));
    host.register("perf", Some(KeyChord::bare('f')), bus, Box::new(|now| Box::new(perf::Perf::new(now))));
    host.register("bruteforce", Some(KeyChord::bare('b')), bus, Box::new(|now| Box::new(bruteforce::BruteForce::new(now))));
    host.register("defrag", None, bus, Box::new(|now| Box::new(defrag::Defrag::new(now))));
    host.register("palette", Some(KeyChord::ctrl('k')), bus, Box::new(|_| Box::new(palette::Palette::new())));
    host.register("panic", None, bus, Box::new(|now| Box::new(panic_gag::PanicGag::new(now))));
}
