//! High score leaderboard system
//!
//! Persisted through a [`ScoreStorage`] backend, tracks top 10 scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{Envelope, ScoreStorage};
use crate::platform::now_ms;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Default `limit` for reads
pub const DEFAULT_LIMIT: usize = MAX_HIGH_SCORES;

/// Name recorded when the player leaves the prompt blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub player_name: String,
    pub score: u64,
    /// Level reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Unix timestamp (ms) when achieved
    #[serde(default, rename = "date", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Trimmed player name, or [`DEFAULT_PLAYER_NAME`] if nothing is left
pub fn normalize_player_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// High score leaderboard backed by durable storage.
///
/// Entries are always sorted descending by score; equal scores keep the order
/// they were achieved in.
pub struct HighScoreStore {
    entries: Vec<HighScoreEntry>,
    storage: Box<dyn ScoreStorage>,
}

impl std::fmt::Debug for HighScoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScoreStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl HighScoreStore {
    /// Storage key for the leaderboard document
    pub const STORAGE_KEY: &'static str = "kitchen_rush_highscores";

    /// Open the leaderboard, loading whatever the backend holds.
    ///
    /// Unreadable or corrupt data is logged and treated as an empty board; the
    /// game stays playable without a history.
    pub fn open(storage: impl ScoreStorage + 'static) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            storage: Box::new(storage),
        };
        store.entries = store.load_entries();
        store
    }

    fn load_entries(&self) -> Vec<HighScoreEntry> {
        let json = match self.storage.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                return Vec::new();
            }
            Err(e) => {
                log::warn!("High score storage unavailable ({e}), starting fresh");
                return Vec::new();
            }
        };

        match Envelope::<Vec<HighScoreEntry>>::decode(&json) {
            Ok(mut entries) => {
                // Stored data may come from older builds or hand edits
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", entries.len());
                entries
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores ({e})");
                Vec::new()
            }
        }
    }

    /// Flush and release the backend
    pub fn close(mut self) {
        self.save();
    }

    /// Write the board to storage. Failures are logged, never propagated.
    pub fn save(&mut self) -> bool {
        let json = match Envelope::new(&self.entries).encode() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode high scores: {e}");
                return false;
            }
        };
        match self.storage.write(Self::STORAGE_KEY, &json) {
            Ok(()) => {
                log::debug!("High scores saved ({} entries)", self.entries.len());
                true
            }
            Err(e) => {
                log::warn!("Failed to save high scores: {e}");
                false
            }
        }
    }

    /// Would `score` make it onto a board of `limit` entries?
    ///
    /// True while fewer than `limit` entries exist, otherwise only if `score`
    /// strictly beats the lowest of the first `limit`.
    pub fn is_high_score(&self, score: u64, limit: usize) -> bool {
        if self.entries.len() < limit {
            return true;
        }
        limit
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .is_some_and(|lowest| score > lowest.score)
    }

    /// Check if a score qualifies for the full leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        self.is_high_score(score, MAX_HIGH_SCORES)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score stamped with the current time.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_high_score(&mut self, name: &str, score: u64, level: Option<u32>) -> Option<usize> {
        self.add_high_score_at(name, score, level, now_ms())
    }

    /// [`add_high_score`](Self::add_high_score) with an explicit timestamp
    pub fn add_high_score_at(
        &mut self,
        name: &str,
        score: u64,
        level: Option<u32>,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.qualifies(score) {
            log::debug!("Score {score} does not make the board");
            return None;
        }

        let entry = HighScoreEntry {
            player_name: normalize_player_name(name),
            score,
            level,
            timestamp: Some(timestamp),
        };

        // Find insertion point (sorted descending by score, ties after existing)
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);
        self.save();

        log::info!("New high score {score} for {} (rank {})", self.entries[pos].player_name, pos + 1);
        Some(pos + 1)
    }

    /// Entries descending by score, at most `limit`
    pub fn high_scores(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Wipe the board, in memory and in storage
    pub fn clear_all_scores(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove(Self::STORAGE_KEY) {
            log::warn!("Failed to clear stored high scores: {e}");
        }
        log::info!("High scores cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Format a timestamp as a relative date string
pub fn format_age(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 1000.0 / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
