//! `WaypointClient` builder and root context.
//!
//! This is the entry point a game embeds. It ties together all the
//! layers: transport → protocol → session → progress / leaderboard, plus
//! the run timer, around one shared [`SessionStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use waypoint_leaderboard::{
    LeaderboardController, LeaderboardError, LeaderboardRow, LeaderboardSnapshot,
    leaderboard_title,
};
use waypoint_progress::{MarkerStore, MenuState, ProgressSync, SceneLoader, SceneTransition};
use waypoint_protocol::{ApiClient, ProgressRecord};
use waypoint_session::{AuthController, AuthState, Session, SessionStore};
use waypoint_timer::{RunGate, RunTimer};
use waypoint_transport::{HttpTransport, ReqwestTransport};

use crate::{ClientConfig, WaypointError};

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring a [`WaypointClient`].
///
/// # Example
///
/// ```rust,no_run
/// use waypoint::prelude::*;
///
/// # fn main() -> Result<(), WaypointError> {
/// let client = WaypointClient::builder()
///     .config(ClientConfig::from_env()?)
///     .build_http(MemoryMarkerStore::new(), |scene: &str| println!("load {scene}"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WaypointClientBuilder {
    config: ClientConfig,
}

impl WaypointClientBuilder {
    /// Creates a builder with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole config.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Shorthand for replacing just the backend origin.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Validates the config and assembles a client around `transport`.
    pub fn build<T, M, L>(
        self,
        transport: T,
        markers: M,
        scenes: L,
    ) -> Result<WaypointClient<T, M, L>, WaypointError>
    where
        T: HttpTransport,
        M: MarkerStore,
        L: SceneLoader,
    {
        let config = self.config.validated()?;
        let api = Arc::new(ApiClient::new(transport, config.base_url.clone()));
        let sessions = SessionStore::new();

        let auth = AuthController::new(Arc::clone(&api), sessions.clone());
        let progress = ProgressSync::new(
            Arc::clone(&api),
            sessions.clone(),
            Arc::new(markers),
            Arc::new(scenes),
            config.sync_config(),
        );
        let leaderboard = LeaderboardController::new(api, sessions.clone());

        tracing::info!(base_url = %config.base_url, "waypoint client ready");

        Ok(WaypointClient {
            config,
            sessions,
            auth: tokio::sync::Mutex::new(auth),
            progress,
            leaderboard,
            run: Mutex::new(RunState::default()),
        })
    }

    /// Like [`build`](Self::build), over HTTPS with the configured timeout.
    pub fn build_http<M, L>(
        self,
        markers: M,
        scenes: L,
    ) -> Result<WaypointClient<ReqwestTransport, M, L>, WaypointError>
    where
        M: MarkerStore,
        L: SceneLoader,
    {
        let transport = ReqwestTransport::with_timeout(self.config.timeout())?;
        self.build(transport, markers, scenes)
    }
}

// ---------------------------------------------------------------------------
// Level results
// ---------------------------------------------------------------------------

/// What the end-of-level screen needs.
#[derive(Debug)]
pub struct LevelResult {
    pub level_id: i32,
    pub time_sec: f32,
    /// `None` when the leaderboard could not be fetched.
    pub board: Option<LeaderboardSnapshot>,
    /// The top rows of `board`, cut to the configured display limit.
    pub rows: Vec<LeaderboardRow>,
    /// The detached score submission. Awaiting it is optional.
    pub submission: JoinHandle<Result<String, LeaderboardError>>,
}

impl LevelResult {
    /// `"Level N – Leaderboard\nYour time: T.TTTs"`.
    pub fn title(&self) -> String {
        leaderboard_title(self.level_id, self.time_sec)
    }
}

#[derive(Debug, Default)]
struct RunState {
    timer: RunTimer,
    gate: RunGate,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The client's root context.
///
/// Owns one session store and hands it to every controller, so a login
/// is immediately visible to progress sync and leaderboard submission.
/// All methods take `&self`; wrap the client in an `Arc` to share it
/// between tasks.
pub struct WaypointClient<T, M, L> {
    config: ClientConfig,
    sessions: SessionStore,
    auth: tokio::sync::Mutex<AuthController<T>>,
    progress: ProgressSync<T, M, L>,
    leaderboard: LeaderboardController<T>,
    run: Mutex<RunState>,
}

impl WaypointClient<(), (), ()> {
    /// Creates a new builder.
    pub fn builder() -> WaypointClientBuilder {
        WaypointClientBuilder::new()
    }
}

impl<T, M, L> WaypointClient<T, M, L>
where
    T: HttpTransport,
    M: MarkerStore,
    L: SceneLoader,
{
    /// The validated config the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session store shared by every controller.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Direct access to progress sync.
    pub fn progress(&self) -> &ProgressSync<T, M, L> {
        &self.progress
    }

    /// Direct access to the leaderboard controller.
    pub fn leaderboard(&self) -> &LeaderboardController<T> {
        &self.leaderboard
    }

    /// A copy of the current session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.sessions.snapshot()
    }

    /// Where the last login or signup attempt left off.
    pub async fn auth_state(&self) -> AuthState {
        self.auth.lock().await.state().clone()
    }

    // -- auth -------------------------------------------------------------

    /// Logs in, then fetches progress and returns what the menu should
    /// offer.
    ///
    /// A failed progress fetch still yields a menu (with "start new game"
    /// enabled); only auth failures and a session replaced mid-flight are
    /// errors.
    pub async fn login(&self, username: &str, password: &str) -> Result<MenuState, WaypointError> {
        self.auth.lock().await.login(username, password).await?;
        Ok(self.progress.on_authenticated().await?)
    }

    /// Signs up (which also logs in), then behaves like [`login`](Self::login).
    pub async fn signup(&self, username: &str, password: &str) -> Result<MenuState, WaypointError> {
        self.auth.lock().await.signup(username, password).await?;
        Ok(self.progress.on_authenticated().await?)
    }

    // -- scenes -----------------------------------------------------------

    /// Starts over from the first scene. See [`ProgressSync::start_new_game`].
    pub async fn start_new_game(&self) -> Result<SceneTransition, WaypointError> {
        let transition = self.progress.start_new_game().await?;
        self.run().gate.reset();
        Ok(transition)
    }

    /// Resumes at the backend checkpoint. See [`ProgressSync::resume`].
    pub async fn resume(&self) -> Result<SceneTransition, WaypointError> {
        let transition = self.progress.resume().await?;
        self.run().gate.reset();
        Ok(transition)
    }

    /// Call once per scene load. Re-arms the run gates for the new scene
    /// and records the checkpoint in the background.
    pub fn enter_scene(&self, scene: impl Into<String>) -> JoinHandle<Option<ProgressRecord>> {
        self.run().gate.reset();
        self.progress.spawn_checkpoint(scene)
    }

    /// Back to the landing scene between levels.
    pub fn return_to_menu(&self) -> SceneTransition {
        self.run().gate.reset();
        self.progress.return_to_menu()
    }

    // -- runs -------------------------------------------------------------

    /// Start gate crossed. Returns `false` if this run already started.
    pub fn start_run(&self) -> bool {
        let mut run = self.run();
        let RunState { timer, gate } = &mut *run;
        gate.enter_start(timer)
    }

    /// Feeds one frame's delta to the running timer.
    pub fn advance_run(&self, dt: Duration) {
        self.run().timer.advance(dt);
    }

    /// Samples the wall clock into the running timer.
    pub fn tick_run(&self) {
        self.run().timer.tick();
    }

    /// Time on the current run so far.
    pub fn run_elapsed(&self) -> Duration {
        self.run().timer.elapsed()
    }

    /// End gate crossed: stops the timer, submits the time in the
    /// background, and fetches the level's leaderboard.
    ///
    /// The fetch does not wait for the submission, so the board may or
    /// may not include this run yet.
    ///
    /// # Errors
    /// [`WaypointError::NoActiveRun`] if the start gate never fired or the
    /// end gate already did.
    pub async fn finish_level(&self, level_id: i32) -> Result<LevelResult, WaypointError> {
        let time_sec = {
            let mut run = self.run();
            let RunState { timer, gate } = &mut *run;
            if !gate.enter_end(timer) {
                return Err(WaypointError::NoActiveRun);
            }
            timer.elapsed_secs()
        };
        tracing::info!(level_id, time_sec, "level finished");

        let submission = self.leaderboard.spawn_submit(level_id, time_sec);
        let board = self.leaderboard.fetch(level_id).await;
        let rows = board
            .as_ref()
            .map(|b| b.rows(self.config.leaderboard_display_limit))
            .unwrap_or_default();

        Ok(LevelResult {
            level_id,
            time_sec,
            board,
            rows,
            submission,
        })
    }

    fn run(&self) -> MutexGuard<'_, RunState> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
