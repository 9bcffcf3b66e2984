//! Local persistence
//!
//! Device-local state (high scores, daily completion, preferences) in a
//! single JSON document on disk. Loads fall back to defaults when the
//! file is missing or unreadable, and saves are best-effort: a broken
//! disk degrades persistence, never gameplay.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::game::GameMode;

/// Completion record for one daily challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatus {
    /// ISO date (`YYYY-MM-DD`) the record belongs to.
    pub date: String,
    /// Whether the challenge was finished.
    pub finished: bool,
    /// Score earned on it.
    pub score: u32,
}

/// Player-tunable settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Catalog locale, e.g. `en_US`.
    pub locale: String,
    /// Whether timed modes run the countdown.
    pub timer_enabled: bool,
    /// Countdown length in seconds.
    pub timer_seconds: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            locale: "en_US".to_string(),
            timer_enabled: true,
            timer_seconds: 15,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    high_scores: BTreeMap<GameMode, u32>,
    #[serde(default)]
    daily: Option<DailyStatus>,
    #[serde(default)]
    preferences: Option<Preferences>,
}

/// The on-disk store.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    doc: Document,
}

impl LocalStore {
    /// Open a store at `path`, reading existing state if present.
    ///
    /// A missing file is a fresh install; a corrupt one is logged and
    /// replaced with defaults on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(doc) => doc,
                Err(err) => {
                    warn!(path = %path.display(), %err, "corrupt local store, starting fresh");
                    Document::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Document::default(),
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable local store, starting fresh");
                Document::default()
            }
        };
        Self { path, doc }
    }

    /// Where this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored high score for a mode (0 when unset).
    pub fn high_score(&self, mode: GameMode) -> u32 {
        self.doc.high_scores.get(&mode).copied().unwrap_or(0)
    }

    /// All stored high scores.
    pub fn high_scores(&self) -> &BTreeMap<GameMode, u32> {
        &self.doc.high_scores
    }

    /// Record a high score. Only ever raises the stored value; returns
    /// the authoritative result.
    pub fn record_high_score(&mut self, mode: GameMode, value: u32) -> u32 {
        let entry = self.doc.high_scores.entry(mode).or_insert(0);
        *entry = (*entry).max(value);
        let result = *entry;
        self.save();
        result
    }

    /// Whether the daily challenge for `date` was already finished.
    pub fn daily_finished(&self, date: &str) -> bool {
        matches!(&self.doc.daily, Some(status) if status.date == date && status.finished)
    }

    /// Completion record for `date`, if any. Records for other dates are
    /// stale and not returned.
    pub fn daily_status(&self, date: &str) -> Option<&DailyStatus> {
        self.doc.daily.as_ref().filter(|s| s.date == date)
    }

    /// Mark the daily challenge for `date` finished with `score`.
    pub fn finish_daily(&mut self, date: &str, score: u32) {
        self.doc.daily = Some(DailyStatus {
            date: date.to_string(),
            finished: true,
            score,
        });
        self.save();
    }

    /// Current preferences (defaults when never set).
    pub fn preferences(&self) -> Preferences {
        self.doc.preferences.clone().unwrap_or_default()
    }

    /// Replace the stored preferences.
    pub fn set_preferences(&mut self, prefs: Preferences) {
        self.doc.preferences = Some(prefs);
        self.save();
    }

    fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.doc) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "failed to serialize local store");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            warn!(path = %self.path.display(), %err, "failed to write local store");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fresh_store_has_defaults() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("quiz.json"));
        assert_eq!(store.high_score(GameMode::Price), 0);
        assert!(store.daily_status("2025-01-01").is_none());
        assert_eq!(store.preferences(), Preferences::default());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quiz.json");

        let mut store = LocalStore::open(&path);
        store.record_high_score(GameMode::Attribute, 12);
        store.finish_daily("2025-01-01", 1);
        store.set_preferences(Preferences {
            locale: "fr_FR".to_string(),
            timer_enabled: false,
            timer_seconds: 30,
        });

        let store = LocalStore::open(&path);
        assert_eq!(store.high_score(GameMode::Attribute), 12);
        assert!(store.daily_finished("2025-01-01"));
        assert_eq!(store.preferences().locale, "fr_FR");
    }

    #[test]
    fn test_high_score_never_lowers() {
        let dir = tempdir().unwrap();
        let mut store = LocalStore::open(dir.path().join("quiz.json"));
        assert_eq!(store.record_high_score(GameMode::Recipe, 9), 9);
        assert_eq!(store.record_high_score(GameMode::Recipe, 4), 9);
        assert_eq!(store.high_score(GameMode::Recipe), 9);
    }

    #[test]
    fn test_daily_record_is_date_scoped() {
        let dir = tempdir().unwrap();
        let mut store = LocalStore::open(dir.path().join("quiz.json"));
        store.finish_daily("2025-01-01", 1);

        // Yesterday's completion does not block today
        assert!(store.daily_finished("2025-01-01"));
        assert!(!store.daily_finished("2025-01-02"));
        assert!(store.daily_status("2025-01-02").is_none());

        store.finish_daily("2025-01-02", 1);
        assert!(!store.daily_finished("2025-01-01"));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quiz.json");
        fs::write(&path, "{not json").unwrap();

        let store = LocalStore::open(&path);
        assert_eq!(store.high_score(GameMode::Daily), 0);
        assert_eq!(store.preferences(), Preferences::default());
    }

    #[test]
    fn test_unwritable_path_degrades_gracefully() {
        // A directory that does not exist: saves fail but calls succeed
        let mut store = LocalStore::open("/nonexistent-dir/quiz.json");
        assert_eq!(store.record_high_score(GameMode::Price, 3), 3);
        assert_eq!(store.high_score(GameMode::Price), 3);
    }
}
