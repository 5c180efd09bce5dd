// Pure deck logic: everything here is driven by explicit `Instant`s and
// injected services, so it all runs under plain unit tests.

pub mod achievements;
pub mod bus;
pub mod cipher;
pub mod command;
pub mod overlay;
pub mod prefs;
pub mod task;
pub mod toast;
