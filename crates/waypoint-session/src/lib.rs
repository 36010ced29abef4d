//! Player session management for Waypoint.
//!
//! This crate handles who the player is:
//!
//! 1. **Authentication**: login/signup against the backend
//!    ([`AuthController`])
//! 2. **Session tracking**: the one current session per client
//!    ([`SessionStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Progress / Leaderboard (above)  ← read the username and credential at call time
//!     ↕
//! Session Layer (this crate)      ← owns player identity
//!     ↕
//! Protocol Layer (below)          ← ApiClient, Credentials, paths
//! ```

mod auth;
mod error;
mod session;

pub use auth::{AuthController, AuthState, extract_session_credential};
pub use error::{AuthAction, AuthError};
pub use session::{Session, SessionStore};
