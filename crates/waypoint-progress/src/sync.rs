//! The progress-sync controller.
//!
//! Decides where the player lands and records where they've been:
//!
//! - after login, whether "resume" is offered ([`ProgressSync::on_authenticated`])
//! - on "start new game", reset and go to the first scene
//!   ([`ProgressSync::start_new_game`])
//! - on "resume", re-fetch and go to the recorded checkpoint
//!   ([`ProgressSync::resume`])
//! - on every scene entry, tell the backend ([`ProgressSync::spawn_checkpoint`])
//! - between levels, go back to the menu ([`ProgressSync::return_to_menu`])
//!
//! # Authority
//!
//! The backend's [`ProgressRecord`] wins whenever it can be fetched. The
//! local marker is only a presence signal: it is never sent to the
//! backend and never compared with it field by field.
//!
//! # Degradation
//!
//! No network failure is fatal here. A failed fetch means "no remote
//! signal"; a failed checkpoint write is logged and the scene loads
//! anyway. The worst case is the player landing on the first scene.

use std::sync::Arc;

use tokio::task::JoinHandle;
use waypoint_protocol::{ApiClient, ApiError, CheckpointRequest, ProgressRecord, paths};
use waypoint_session::{Session, SessionStore};
use waypoint_transport::HttpTransport;

use crate::{MarkerStore, ProgressError, SceneLoader};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings for progress decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Where new games start, and where resume lands when there is no
    /// usable checkpoint.
    pub first_scene: String,

    /// The menu scene players return to between levels.
    pub landing_scene: String,

    /// Local marker key is `{save_key_prefix}{username}`.
    pub save_key_prefix: String,

    /// When the backend is reachable and reports no checkpoint, should a
    /// local marker still enable "resume"? `true` keeps the OR rule;
    /// `false` makes a reachable backend fully authoritative.
    pub trust_marker_when_remote_empty: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            first_scene: "1".to_string(),
            landing_scene: "landingScene".to_string(),
            save_key_prefix: "SaveData_".to_string(),
            trust_marker_when_remote_empty: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// Which signal made "resume" available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSignal {
    /// The backend has a non-empty checkpoint.
    Remote,
    /// Only the local marker exists.
    LocalMarker,
    /// Nothing to resume.
    None,
}

/// What the landing menu should offer after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    /// Always `true`: starting over never depends on the network.
    pub can_start_new: bool,
    pub can_resume: bool,
    pub resume_signal: ResumeSignal,
    /// The fetched record, or `None` if the fetch failed.
    pub remote: Option<ProgressRecord>,
}

/// Why a particular scene was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOrigin {
    /// A new game was started.
    NewGame,
    /// Resumed at the backend's checkpoint.
    Checkpoint,
    /// Resume had nothing usable and fell back to the first scene.
    Fallback,
    /// Back to the landing menu.
    Menu,
}

/// A scene load the controller performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTransition {
    pub scene: String,
    pub origin: TransitionOrigin,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Reconciles local and remote progress and drives scene entry.
///
/// Cheap to clone: all parts are shared handles, so detached tasks can
/// carry their own copy.
pub struct ProgressSync<T, M, L> {
    api: Arc<ApiClient<T>>,
    sessions: SessionStore,
    markers: Arc<M>,
    scenes: Arc<L>,
    config: Arc<SyncConfig>,
}

impl<T, M, L> Clone for ProgressSync<T, M, L> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            sessions: self.sessions.clone(),
            markers: Arc::clone(&self.markers),
            scenes: Arc::clone(&self.scenes),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T, M, L> ProgressSync<T, M, L>
where
    T: HttpTransport,
    M: MarkerStore,
    L: SceneLoader,
{
    /// Assembles a controller from shared client parts.
    pub fn new(
        api: Arc<ApiClient<T>>,
        sessions: SessionStore,
        markers: Arc<M>,
        scenes: Arc<L>,
        config: SyncConfig,
    ) -> Self {
        Self {
            api,
            sessions,
            markers,
            scenes,
            config: Arc::new(config),
        }
    }

    /// The settings this controller decides with.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The local marker key for `username`.
    pub fn marker_key(&self, username: &str) -> String {
        format!("{}{username}", self.config.save_key_prefix)
    }

    /// Post-login fetch: works out what the menu should offer.
    ///
    /// # Errors
    /// - [`ProgressError::NotAuthenticated`]: nobody is logged in
    /// - [`ProgressError::StaleSession`]: another login replaced the
    ///   session while the fetch was in flight; the result is dropped
    pub async fn on_authenticated(&self) -> Result<MenuState, ProgressError> {
        let session = self.require_session()?;
        let has_local = self.markers.has_marker(&self.marker_key(&session.username));

        let remote = match self.fetch_remote(&session).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    username = %session.username,
                    error = %e,
                    "progress fetch failed, using local marker only"
                );
                None
            }
        };

        self.ensure_current(&session)?;

        let menu = self.menu_state(has_local, remote);
        tracing::info!(
            username = %session.username,
            can_resume = menu.can_resume,
            signal = ?menu.resume_signal,
            "menu ready"
        );
        Ok(menu)
    }

    /// Combines the two resumability signals.
    pub fn menu_state(&self, has_local: bool, remote: Option<ProgressRecord>) -> MenuState {
        let remote_checkpoint = remote
            .as_ref()
            .and_then(ProgressRecord::checkpoint_scene)
            .is_some();
        let remote_reachable = remote.is_some();

        let resume_signal = if remote_checkpoint {
            ResumeSignal::Remote
        } else if has_local && (!remote_reachable || self.config.trust_marker_when_remote_empty) {
            ResumeSignal::LocalMarker
        } else {
            ResumeSignal::None
        };

        MenuState {
            can_start_new: true,
            can_resume: resume_signal != ResumeSignal::None,
            resume_signal,
            remote,
        }
    }

    /// Clears the old local save, records the first scene as the
    /// checkpoint, and loads it.
    ///
    /// The scene loads whether or not the checkpoint write succeeded.
    ///
    /// # Errors
    /// - [`ProgressError::NotAuthenticated`]: nobody is logged in
    /// - [`ProgressError::StaleSession`]: the session was replaced during
    ///   the write; no scene is loaded
    pub async fn start_new_game(&self) -> Result<SceneTransition, ProgressError> {
        let session = self.require_session()?;
        let key = self.marker_key(&session.username);

        if let Err(e) = self.markers.delete_marker(&key) {
            tracing::warn!(error = %e, "could not clear old save marker");
        }
        if let Err(e) = self.markers.set_marker(&key) {
            tracing::warn!(error = %e, "could not create save marker");
        }

        let first_scene = self.config.first_scene.clone();
        if let Err(e) = self.write_checkpoint(&session, &first_scene).await {
            tracing::warn!(
                username = %session.username,
                error = %e,
                "new-game checkpoint failed, loading first scene anyway"
            );
        }

        self.ensure_current(&session)?;
        Ok(self.transition(first_scene, TransitionOrigin::NewGame))
    }

    /// Re-fetches progress and loads the recorded checkpoint, or the first
    /// scene if there is none or the fetch fails.
    ///
    /// The fetch always completes before the decision; an in-memory copy
    /// from login is never trusted.
    ///
    /// # Errors
    /// - [`ProgressError::NotAuthenticated`]: nobody is logged in
    /// - [`ProgressError::StaleSession`]: the session was replaced during
    ///   the fetch; no scene is loaded
    pub async fn resume(&self) -> Result<SceneTransition, ProgressError> {
        let session = self.require_session()?;

        let checkpoint = match self.fetch_remote(&session).await {
            Ok(record) => record.checkpoint_scene().map(str::to_string),
            Err(e) => {
                tracing::warn!(
                    username = %session.username,
                    error = %e,
                    "resume fetch failed, falling back to first scene"
                );
                None
            }
        };
        self.ensure_current(&session)?;

        let transition = match checkpoint {
            Some(scene) => self.transition(scene, TransitionOrigin::Checkpoint),
            None => self.transition(self.config.first_scene.clone(), TransitionOrigin::Fallback),
        };
        Ok(transition)
    }

    /// Loads the landing scene. Needs no session and touches no progress.
    pub fn return_to_menu(&self) -> SceneTransition {
        self.transition(self.config.landing_scene.clone(), TransitionOrigin::Menu)
    }

    /// Records `scene` as the player's checkpoint.
    ///
    /// Returns the backend's updated record, or `None` if there is no
    /// session or the write failed. Failures are logged, never surfaced
    /// and never retried.
    pub async fn record_checkpoint(&self, scene: &str) -> Option<ProgressRecord> {
        let Some(session) = self.sessions.snapshot() else {
            tracing::info!(scene, "no logged-in user, skipping checkpoint");
            return None;
        };

        match self.write_checkpoint(&session, scene).await {
            Ok(record) => {
                tracing::info!(username = %session.username, scene, "checkpoint saved");
                Some(record)
            }
            Err(e) => {
                tracing::warn!(
                    username = %session.username,
                    scene,
                    status = e.status(),
                    body = e.raw_body().unwrap_or_default(),
                    error = %e,
                    "checkpoint write failed"
                );
                None
            }
        }
    }

    /// Detaches [`record_checkpoint`](Self::record_checkpoint) onto the
    /// Tokio runtime so scene logic never waits on the network.
    pub fn spawn_checkpoint(
        &self,
        scene: impl Into<String>,
    ) -> JoinHandle<Option<ProgressRecord>> {
        let this = self.clone();
        let scene = scene.into();
        tokio::spawn(async move { this.record_checkpoint(&scene).await })
    }

    fn require_session(&self) -> Result<Session, ProgressError> {
        self.sessions.snapshot().ok_or_else(|| {
            tracing::warn!("progress operation attempted without login");
            ProgressError::NotAuthenticated
        })
    }

    // Results fetched for a replaced session must not drive the new one.
    fn ensure_current(&self, session: &Session) -> Result<(), ProgressError> {
        let current = self.sessions.generation();
        if current == session.generation {
            return Ok(());
        }
        tracing::info!(
            username = %session.username,
            started = session.generation,
            current,
            "discarding progress result for replaced session"
        );
        Err(ProgressError::StaleSession {
            started: session.generation,
            current,
        })
    }

    async fn fetch_remote(&self, session: &Session) -> Result<ProgressRecord, ApiError> {
        let response = self
            .api
            .get::<ProgressRecord>(
                paths::GAME_STATE,
                &[("username", session.username.as_str())],
                session.credential.as_deref(),
            )
            .await?;
        Ok(response.body)
    }

    async fn write_checkpoint(
        &self,
        session: &Session,
        scene: &str,
    ) -> Result<ProgressRecord, ApiError> {
        let request = CheckpointRequest::new(session.username.clone(), scene);
        let response = self
            .api
            .post::<_, ProgressRecord>(paths::CHECKPOINT, &request, session.credential.as_deref())
            .await?;
        Ok(response.body)
    }

    fn transition(&self, scene: String, origin: TransitionOrigin) -> SceneTransition {
        tracing::info!(%scene, ?origin, "loading scene");
        self.scenes.load_scene(&scene);
        SceneTransition { scene, origin }
    }
}
