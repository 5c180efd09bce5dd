use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

// ── Keys ──────────────────────────────────────────────────────────────────────
// Flat string map, every key namespaced so the file stays greppable.

pub const PREFIX: &str = "deck.";

pub const KEY_THEME: &str = "deck.theme";
pub const KEY_MUTED: &str = "deck.muted";
pub const KEY_BOOT: &str = "deck.boot";
pub const KEY_VISITS: &str = "deck.visits";
pub const KEY_LAST_VISIT: &str = "deck.last_visit";
pub const KEY_STREAK: &str = "deck.streak";
pub const KEY_ACHIEVEMENTS: &str = "deck.achievements";
pub const KEY_SECRETS: &str = "deck.secrets";

pub const DEFAULT_THEME: &str = "cyber";

// ── Store ─────────────────────────────────────────────────────────────────────

/// Durable key/value flags. Backed by a JSON file under the user config dir;
/// when that dir is unavailable or a write fails the store degrades to
/// session-only memory and stays there. Reads never fail: a missing or
/// garbled key yields its typed default.
pub struct PrefStore {
    path: Option<PathBuf>,
    map: BTreeMap<String, String>,
}

impl PrefStore {
    /// Open the store at `path`; `None` (no config dir on this platform)
    /// falls back to memory-only.
    pub fn open_at(path: Option<PathBuf>) -> Self {
        let map = path
            .as_deref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| serde_json::from_str::<BTreeMap<String, String>>(&s).ok())
            .unwrap_or_default();
        Self { path, map }
    }

    /// Memory-only store, used by tests and as the degraded mode.
    pub fn in_memory() -> Self {
        Self { path: None, map: BTreeMap::new() }
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    // ── Typed reads: never throw, never yield an un-defaulted absence ────────

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.map.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.map.get(key).map(String::as_str) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.map
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// JSON-encoded string array; malformed JSON collapses to empty.
    pub fn get_ids(&self, key: &str) -> Vec<String> {
        self.map
            .get(key)
            .and_then(|v| serde_json::from_str::<Value>(v).ok())
            .and_then(|v| match v {
                Value::Array(items) => Some(
                    items
                        .into_iter()
                        .filter_map(|i| i.as_str().map(str::to_string))
                        .collect(),
                ),
                _ => None,
            })
            .unwrap_or_default()
    }

    // ── Writes: best-effort, failures swallowed ──────────────────────────────

    pub fn set_str(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
        self.persist();
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set_str(key, if value { "true" } else { "false" });
    }

    pub fn set_u64(&mut self, key: &str, value: u64) {
        self.set_str(key, &value.to_string());
    }

    pub fn set_ids(&mut self, key: &str, ids: &[String]) {
        let json = serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string());
        self.set_str(key, &json);
    }

    /// Ensure `member` is present in the persisted set at `key`. Idempotent;
    /// returns true only when the member was newly added.
    pub fn toggle_set(&mut self, key: &str, member: &str) -> bool {
        let mut ids = self.get_ids(key);
        if ids.iter().any(|i| i == member) {
            return false;
        }
        ids.push(member.to_string());
        self.set_ids(key, &ids);
        true
    }

    fn persist(&mut self) {
        let Some(path) = self.path.clone() else { return };
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&self.map)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            std::fs::write(&path, json)
        };
        if write().is_err() {
            // Quota/permissions/whatever: stay session-only from here on.
            self.path = None;
        }
    }
}

// ── Visit bookkeeping ─────────────────────────────────────────────────────────

/// Outcome of the per-launch visit bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub count: u64,
    pub streak: u64,
    pub first_ever: bool,
}

/// Bump the visit counter and the consecutive-day streak; consecutive means
/// yesterday's date was the last one recorded.
pub fn record_visit(prefs: &mut PrefStore, today: chrono::NaiveDate) -> Visit {
    let count = prefs.get_u64(KEY_VISITS, 0) + 1;
    prefs.set_u64(KEY_VISITS, count);

    let last = prefs.get_str(KEY_LAST_VISIT, "");
    let prev_streak = prefs.get_u64(KEY_STREAK, 0);
    let streak = match last.parse::<chrono::NaiveDate>() {
        Ok(d) if d == today => prev_streak.max(1),
        Ok(d) if today.signed_duration_since(d).num_days() == 1 => prev_streak + 1,
        _ => 1,
    };
    prefs.set_u64(KEY_STREAK, streak);
    prefs.set_str(KEY_LAST_VISIT, &today.to_string());

    Visit { count, streak, first_ever: count == 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn fresh_store_returns_typed_defaults() {
        let p = PrefStore::in_memory();
        assert_eq!(p.get_str(KEY_THEME, DEFAULT_THEME), "cyber");
        assert!(!p.get_bool(KEY_MUTED, false));
        assert!(p.get_bool(KEY_BOOT, true));
        assert_eq!(p.get_u64(KEY_VISITS, 0), 0);
        assert!(p.get_ids(KEY_ACHIEVEMENTS).is_empty());
    }

    #[test]
    fn round_trips_every_supported_value_shape() {
        let mut p = PrefStore::in_memory();
        p.set_str(KEY_THEME, "green");
        p.set_bool(KEY_MUTED, true);
        p.set_u64(KEY_VISITS, 42);
        p.set_ids(KEY_SECRETS, &["s1".into(), "s2".into()]);

        assert_eq!(p.get_str(KEY_THEME, DEFAULT_THEME), "green");
        assert!(p.get_bool(KEY_MUTED, false));
        assert_eq!(p.get_u64(KEY_VISITS, 0), 42);
        assert_eq!(p.get_ids(KEY_SECRETS), vec!["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn malformed_json_collapses_to_empty() {
        let mut p = PrefStore::in_memory();
        p.set_str(KEY_ACHIEVEMENTS, "{not json[");
        assert!(p.get_ids(KEY_ACHIEVEMENTS).is_empty());
    }

    #[test]
    fn toggle_set_is_idempotent() {
        let mut p = PrefStore::in_memory();
        assert!(p.toggle_set(KEY_ACHIEVEMENTS, "first_boot"));
        assert!(!p.toggle_set(KEY_ACHIEVEMENTS, "first_boot"));
        assert_eq!(p.get_ids(KEY_ACHIEVEMENTS).len(), 1);
    }

    #[test]
    fn persists_and_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut p = PrefStore::open_at(Some(path.clone()));
        p.set_str(KEY_THEME, "green");
        p.set_ids(KEY_SECRETS, &["hidden1".into()]);

        let q = PrefStore::open_at(Some(path));
        assert_eq!(q.get_str(KEY_THEME, DEFAULT_THEME), "green");
        assert_eq!(q.get_ids(KEY_SECRETS), vec!["hidden1".to_string()]);
    }

    #[test]
    fn unwritable_path_degrades_to_memory() {
        let mut p = PrefStore::open_at(Some(PathBuf::from("/proc/nope/prefs.json")));
        p.set_str(KEY_THEME, "green");
        // Write failed silently; the value still reads back this session.
        assert!(!p.is_persistent());
        assert_eq!(p.get_str(KEY_THEME, DEFAULT_THEME), "green");
    }

    #[test]
    fn streak_counts_consecutive_days_only() {
        let mut p = PrefStore::in_memory();
        let v1 = record_visit(&mut p, d("2026-03-01"));
        assert_eq!((v1.count, v1.streak, v1.first_ever), (1, 1, true));

        let v2 = record_visit(&mut p, d("2026-03-02"));
        assert_eq!((v2.count, v2.streak), (2, 2));

        // Same day: streak holds, count still bumps.
        let v3 = record_visit(&mut p, d("2026-03-02"));
        assert_eq!((v3.count, v3.streak), (3, 2));

        // Gap resets.
        let v4 = record_visit(&mut p, d("2026-03-05"));
        assert_eq!(v4.streak, 1);
    }
}
