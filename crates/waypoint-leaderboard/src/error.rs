//! Error types for the leaderboard layer.

use waypoint_protocol::ApiError;

/// Errors from a score submission.
///
/// Fetch failures are not errors: [`fetch`](crate::LeaderboardController::fetch)
/// returns `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    /// Submission needs a username and nobody is logged in.
    #[error("no authenticated session to submit a score for")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),
}
