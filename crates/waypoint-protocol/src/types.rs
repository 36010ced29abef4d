//! Wire types for the Waypoint backend.
//!
//! Every struct here is serialized to or from JSON exactly as the backend
//! expects it. Field names on the wire are camelCase (`lastScene`,
//! `timeSec`, `playerName`), so each type carries
//! `#[serde(rename_all = "camelCase")]` and keeps snake_case in Rust.

use serde::{Deserialize, Deserializer, Serialize};

/// Endpoint paths, relative to the configured base URL.
pub mod paths {
    pub const SIGNUP: &str = "/api/auth/signup";
    pub const LOGIN: &str = "/api/auth/login";
    pub const GAME_STATE: &str = "/api/game/state";
    pub const CHECKPOINT: &str = "/api/game/checkpoint";

    /// `/api/leaderboard/{level_id}`, used for both submit and fetch.
    pub fn leaderboard(level_id: i32) -> String {
        format!("/api/leaderboard/{level_id}")
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Body of `POST /api/auth/signup` and `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Builds the auth request body.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Hand-written so passwords never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Success body of the auth endpoints. Every field is optional because the
/// backend only uses this for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    pub message: Option<String>,
    pub username: Option<String>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// The backend's authoritative progress record for one player.
///
/// Returned by `GET /api/game/state` and echoed back by
/// `POST /api/game/checkpoint`. Missing or `null` numeric fields default
/// to 0 and a missing or `null` `lastScene` means "no checkpoint yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub level: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub coins: u32,
    pub last_scene: Option<String>,
}

impl ProgressRecord {
    /// The checkpoint scene, if one is recorded. An empty string counts as
    /// no checkpoint.
    pub fn checkpoint_scene(&self) -> Option<&str> {
        self.last_scene.as_deref().filter(|s| !s.trim().is_empty())
    }
}

// A present `null` skips `#[serde(default)]`, so it is mapped here.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/game/checkpoint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointRequest {
    pub username: String,
    pub last_scene: String,
}

impl CheckpointRequest {
    /// Builds the checkpoint body for `username` entering `last_scene`.
    pub fn new(username: impl Into<String>, last_scene: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            last_scene: last_scene.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// Body of `POST /api/leaderboard/{level_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub username: String,
    pub time_sec: f32,
}

/// One ranked row as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_name: String,
    pub time_sec: f32,
    /// Opaque timestamp string; never parsed client-side.
    #[serde(default)]
    pub created_at: String,
}

/// Success body of `GET /api/leaderboard/{level_id}`.
///
/// `scores` is in the backend's ranking order and must stay that way. A
/// missing `levelId` decodes as 0; callers know which level they asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub level_id: i32,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}
