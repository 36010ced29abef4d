//! Score submission and leaderboard retrieval.

use std::sync::Arc;

use tokio::task::JoinHandle;
use waypoint_protocol::{ApiClient, LeaderboardResponse, ScoreSubmission, paths};
use waypoint_session::SessionStore;
use waypoint_transport::HttpTransport;

use crate::{LeaderboardError, LeaderboardSnapshot};

/// Submits run times and fetches per-level rankings.
///
/// Shares only the [`SessionStore`] with the rest of the client. The
/// username is read at call time, so a controller built before login
/// submits under whoever is logged in when the run ends.
pub struct LeaderboardController<T> {
    api: Arc<ApiClient<T>>,
    sessions: SessionStore,
}

impl<T> Clone for LeaderboardController<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            sessions: self.sessions.clone(),
        }
    }
}

impl<T: HttpTransport> LeaderboardController<T> {
    /// Creates a controller sharing `api` and `sessions` with the client.
    pub fn new(api: Arc<ApiClient<T>>, sessions: SessionStore) -> Self {
        Self { api, sessions }
    }

    /// Posts `time_sec` for `level_id` under the current user.
    ///
    /// Returns the backend's acknowledgment text, which the client treats
    /// as opaque. Failures are logged with whatever diagnostics exist
    /// (status, transport error, raw body) before being returned.
    pub async fn submit(&self, level_id: i32, time_sec: f32) -> Result<String, LeaderboardError> {
        let Some(session) = self.sessions.snapshot() else {
            tracing::warn!(level_id, time_sec, "no logged-in user, score not submitted");
            return Err(LeaderboardError::NotAuthenticated);
        };

        let submission = ScoreSubmission {
            username: session.username.clone(),
            time_sec,
        };
        let result = self
            .api
            .post_raw(
                &paths::leaderboard(level_id),
                &submission,
                session.credential.as_deref(),
            )
            .await;

        match result {
            Ok(response) => {
                tracing::info!(
                    username = %session.username,
                    level_id,
                    time_sec,
                    ack = %response.body,
                    "run stored"
                );
                Ok(response.body)
            }
            Err(e) => {
                tracing::error!(
                    username = %session.username,
                    level_id,
                    status = e.status(),
                    body = e.raw_body().unwrap_or_default(),
                    error = %e,
                    "score submission failed"
                );
                Err(e.into())
            }
        }
    }

    /// Detaches [`submit`](Self::submit) so the caller's UI flow continues
    /// immediately.
    pub fn spawn_submit(
        &self,
        level_id: i32,
        time_sec: f32,
    ) -> JoinHandle<Result<String, LeaderboardError>> {
        let this = self.clone();
        tokio::spawn(async move { this.submit(level_id, time_sec).await })
    }

    /// Fetches the ranked list for `level_id`.
    ///
    /// `None` means "show no rows": any failure is logged and swallowed.
    /// An empty `scores` array is a successful, empty snapshot, and a body
    /// without `levelId` is labelled with the requested level.
    pub async fn fetch(&self, level_id: i32) -> Option<LeaderboardSnapshot> {
        let credential = self.sessions.current_credential();
        if credential.is_none() {
            tracing::warn!(level_id, "fetching leaderboard without a session cookie");
        }

        let result = self
            .api
            .get::<LeaderboardResponse>(&paths::leaderboard(level_id), &[], credential.as_deref())
            .await;

        match result {
            Ok(response) => {
                let mut body = response.body;
                if body.level_id == 0 {
                    body.level_id = level_id;
                }
                let snapshot = LeaderboardSnapshot::from(body);
                tracing::debug!(level_id, entries = snapshot.len(), "leaderboard fetched");
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(
                    level_id,
                    status = e.status(),
                    body = e.raw_body().unwrap_or_default(),
                    error = %e,
                    "no leaderboard data received"
                );
                None
            }
        }
    }
}
