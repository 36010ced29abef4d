//! Unified error type for the Waypoint client.

use waypoint_leaderboard::LeaderboardError;
use waypoint_progress::{MarkerError, ProgressError};
use waypoint_protocol::ApiError;
use waypoint_session::AuthError;
use waypoint_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WaypointError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),

    /// `finish_level` was called without a run in progress.
    #[error("no run in progress")]
    NoActiveRun,
}

impl WaypointError {
    /// Text for the player, when the failure is one they can act on.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Auth(e) => Some(e.user_message()),
            _ => None,
        }
    }
}
