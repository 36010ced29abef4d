//! Per-level leaderboards for Waypoint.
//!
//! - [`LeaderboardController`] submits finished run times and fetches the
//!   ranked list for a level
//! - [`LeaderboardSnapshot`] holds a fetched list in the backend's order
//!   and turns it into display rows

mod controller;
mod display;
mod error;

pub use controller::LeaderboardController;
pub use display::{LeaderboardRow, LeaderboardSnapshot, format_time, leaderboard_title};
pub use error::LeaderboardError;
