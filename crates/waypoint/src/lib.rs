//! # Waypoint
//!
//! Client-side session and progress sync for level-based games.
//!
//! Waypoint logs a player in against a JSON backend, decides whether the
//! landing menu can offer "resume", keeps the backend's checkpoint in step
//! with the scenes the player enters, and times runs for per-level
//! leaderboards. Every network failure degrades to something playable:
//! the worst case is the player starting from the first scene.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use waypoint::prelude::*;
//!
//! # async fn run() -> Result<(), WaypointError> {
//! waypoint::telemetry::init_tracing();
//!
//! let client = WaypointClient::builder()
//!     .config(ClientConfig::from_env()?)
//!     .build_http(FileMarkerStore::open("saves")?, |scene: &str| {
//!         println!("loading scene {scene}");
//!     })?;
//!
//! let menu = client.login("ana", "hunter2").await?;
//! if menu.can_resume {
//!     client.resume().await?;
//! } else {
//!     client.start_new_game().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod telemetry;

pub use client::{LevelResult, WaypointClient, WaypointClientBuilder};
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::WaypointError;

pub use waypoint_leaderboard as leaderboard;
pub use waypoint_progress as progress;
pub use waypoint_protocol as protocol;
pub use waypoint_session as session;
pub use waypoint_timer as timer;
pub use waypoint_transport as transport;

/// The types most games need.
pub mod prelude {
    pub use crate::{ClientConfig, LevelResult, WaypointClient, WaypointError};
    pub use waypoint_leaderboard::{LeaderboardRow, LeaderboardSnapshot};
    pub use waypoint_progress::{
        FileMarkerStore, MarkerStore, MemoryMarkerStore, MenuState, ResumeSignal, SceneLoader,
        SceneTransition, TransitionOrigin,
    };
    pub use waypoint_session::{AuthError, AuthState, Session, SessionStore};
    pub use waypoint_timer::format_elapsed;
    pub use waypoint_transport::{HttpTransport, ReqwestTransport};
}
