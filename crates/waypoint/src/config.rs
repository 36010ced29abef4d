//! Client configuration.

use std::time::Duration;

use serde::Deserialize;
use waypoint_progress::SyncConfig;

/// Backend the shipped game talks to.
pub const DEFAULT_BASE_URL: &str = "https://unity-backend-wdzk.onrender.com";

/// Errors from loading or validating a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("`{0}` must not be empty")]
    Empty(&'static str),

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// A JSON config document did not match the schema.
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything the client needs to know before it talks to a backend.
///
/// Every field has a default, so a config document only needs the fields
/// it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin. Endpoint paths are appended to it.
    pub base_url: String,

    /// Scene a new game starts in; also the resume fallback.
    pub first_scene: String,

    /// Menu scene between levels.
    pub landing_scene: String,

    /// Prefix of the per-user local save marker key.
    pub save_key_prefix: String,

    /// Rows shown on the end-of-level leaderboard.
    pub leaderboard_display_limit: usize,

    /// Per-request timeout in seconds. `None` waits as long as the
    /// transport does.
    pub request_timeout: Option<u64>,

    /// Whether a local marker enables resume when a reachable backend
    /// reports no checkpoint.
    pub trust_marker_when_remote_empty: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            first_scene: "1".to_string(),
            landing_scene: "landingScene".to_string(),
            save_key_prefix: "SaveData_".to_string(),
            leaderboard_display_limit: 5,
            request_timeout: None,
            trust_marker_when_remote_empty: true,
        }
    }
}

impl ClientConfig {
    /// Parses a JSON config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by `WAYPOINT_*` environment variables:
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `WAYPOINT_BASE_URL` | `base_url` |
    /// | `WAYPOINT_FIRST_SCENE` | `first_scene` |
    /// | `WAYPOINT_LANDING_SCENE` | `landing_scene` |
    /// | `WAYPOINT_SAVE_KEY_PREFIX` | `save_key_prefix` |
    /// | `WAYPOINT_LEADERBOARD_LIMIT` | `leaderboard_display_limit` |
    /// | `WAYPOINT_REQUEST_TIMEOUT_SECS` | `request_timeout` |
    /// | `WAYPOINT_TRUST_LOCAL_MARKER` | `trust_marker_when_remote_empty` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. [`from_env`](Self::from_env) passes the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("WAYPOINT_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("WAYPOINT_FIRST_SCENE") {
            self.first_scene = v;
        }
        if let Some(v) = lookup("WAYPOINT_LANDING_SCENE") {
            self.landing_scene = v;
        }
        if let Some(v) = lookup("WAYPOINT_SAVE_KEY_PREFIX") {
            self.save_key_prefix = v;
        }
        if let Some(v) = lookup("WAYPOINT_LEADERBOARD_LIMIT") {
            self.leaderboard_display_limit = parse_var("WAYPOINT_LEADERBOARD_LIMIT", v)?;
        }
        if let Some(v) = lookup("WAYPOINT_REQUEST_TIMEOUT_SECS") {
            self.request_timeout = Some(parse_var("WAYPOINT_REQUEST_TIMEOUT_SECS", v)?);
        }
        if let Some(v) = lookup("WAYPOINT_TRUST_LOCAL_MARKER") {
            self.trust_marker_when_remote_empty = parse_var("WAYPOINT_TRUST_LOCAL_MARKER", v)?;
        }
        Ok(self)
    }

    /// Normalizes and checks the config so it is safe to build a client
    /// from.
    ///
    /// - A trailing `/` on `base_url` is stripped.
    /// - An empty `base_url` or `first_scene` is rejected.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::Empty("base_url"));
        }
        self.base_url = trimmed.to_string();

        if self.first_scene.trim().is_empty() {
            return Err(ConfigError::Empty("first_scene"));
        }
        Ok(self)
    }

    /// `request_timeout` as a `Duration`; `None` leaves reqwest unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    /// The part of this config the progress controller uses.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            first_scene: self.first_scene.clone(),
            landing_scene: self.landing_scene.clone(),
            save_key_prefix: self.save_key_prefix.clone(),
            trust_marker_when_remote_empty: self.trust_marker_when_remote_empty,
        }
    }
}

fn parse_var<V: std::str::FromStr>(var: &'static str, value: String) -> Result<V, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}
