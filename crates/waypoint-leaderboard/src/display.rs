//! Turning a fetched leaderboard into rows a UI can show.

use std::fmt;

use waypoint_protocol::{LeaderboardResponse, ScoreEntry};

/// A fetched leaderboard for one level.
///
/// Entries stay in exactly the order the backend ranked them.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardSnapshot {
    level_id: i32,
    entries: Vec<ScoreEntry>,
}

impl LeaderboardSnapshot {
    /// The level these scores belong to.
    pub fn level_id(&self) -> i32 {
        self.level_id
    }

    /// All entries, best first.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Number of ranked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody has a time on this level yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `limit` entries as display rows, ranked from 1.
    ///
    /// Borrowing only: the snapshot itself is never truncated or reordered.
    pub fn rows(&self, limit: usize) -> Vec<LeaderboardRow> {
        self.entries
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, entry)| LeaderboardRow {
                rank: i + 1,
                player_name: entry.player_name.clone(),
                time_text: format_time(entry.time_sec),
            })
            .collect()
    }
}

impl From<LeaderboardResponse> for LeaderboardSnapshot {
    fn from(response: LeaderboardResponse) -> Self {
        Self {
            level_id: response.level_id,
            entries: response.scores,
        }
    }
}

/// One rendered leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub player_name: String,
    /// Seconds with three decimals and an `s` suffix, e.g. `12.345s`.
    pub time_text: String,
}

impl fmt::Display for LeaderboardRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} {}", self.rank, self.player_name, self.time_text)
    }
}

/// `12.345` → `"12.345s"`.
pub fn format_time(time_sec: f32) -> String {
    format!("{time_sec:.3}s")
}

/// The panel heading shown above a level's rows.
pub fn leaderboard_title(level_id: i32, your_time_sec: f32) -> String {
    format!(
        "Level {level_id} – Leaderboard\nYour time: {}",
        format_time(your_time_sec)
    )
}
