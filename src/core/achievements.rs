use serde_json::json;

use crate::core::bus::{Bus, SIG_ACHIEVEMENT};
use crate::core::prefs::{PrefStore, KEY_ACHIEVEMENTS};

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement { id: "first_boot", title: "JACKED IN", description: "Booted the deck for the first time" },
    Achievement { id: "streak_3", title: "REGULAR", description: "Visited three days in a row" },
    Achievement { id: "console_hacker", title: "SCRIPT KIDDIE", description: "Ran five console commands inside a second and a half" },
    Achievement { id: "secret_hunter", title: "GHOST IN THE SHELL", description: "Scanned out every hidden node" },
    Achievement { id: "code_breaker", title: "ICE BREAKER", description: "Watched a brute-force run to completion" },
    Achievement { id: "night_owl", title: "NIGHT OWL", description: "Jacked in after midnight" },
];

pub fn by_id(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

// ── Unlock ────────────────────────────────────────────────────────────────────

/// Unlock an achievement. Monotonic: membership only ever grows, and only the
/// first unlock for an id broadcasts `achievement-unlocked`. Unknown ids are
/// ignored so stale persisted data can't mint ghost toasts.
pub fn unlock(prefs: &mut PrefStore, bus: &Bus, id: &str) -> bool {
    if by_id(id).is_none() {
        return false;
    }
    if !prefs.toggle_set(KEY_ACHIEVEMENTS, id) {
        return false;
    }
    bus.emit(SIG_ACHIEVEMENT, Some(&json!(id)));
    true
}

pub fn is_unlocked(prefs: &PrefStore, id: &str) -> bool {
    prefs.get_ids(KEY_ACHIEVEMENTS).iter().any(|i| i == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn first_unlock_broadcasts_and_persists() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _sub = bus.subscribe(SIG_ACHIEVEMENT, move |d| {
            s.borrow_mut().push(d.unwrap().as_str().unwrap().to_string());
        });

        assert!(unlock(&mut prefs, &bus, "first_boot"));
        assert!(is_unlocked(&prefs, "first_boot"));
        assert_eq!(*seen.borrow(), vec!["first_boot".to_string()]);
    }

    #[test]
    fn repeat_unlock_is_silent_and_set_does_not_grow() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();

        assert!(unlock(&mut prefs, &bus, "first_boot"));
        assert!(!unlock(&mut prefs, &bus, "first_boot"));
        assert!(!unlock(&mut prefs, &bus, "first_boot"));

        let ids = prefs.get_ids(KEY_ACHIEVEMENTS);
        assert_eq!(ids.iter().filter(|i| *i == "first_boot").count(), 1);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let bus = Bus::new();
        let mut prefs = PrefStore::in_memory();
        assert!(!unlock(&mut prefs, &bus, "not_a_real_one"));
        assert!(prefs.get_ids(KEY_ACHIEVEMENTS).is_empty());
    }
}
