//! Wire protocol for Waypoint.
//!
//! This crate defines the "language" the client speaks with the backend:
//!
//! - **Types** ([`Credentials`], [`ProgressRecord`], [`CheckpointRequest`],
//!   [`ScoreSubmission`], [`LeaderboardResponse`], ...): the JSON bodies
//!   that travel on the wire, and the endpoint [`paths`].
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how bodies become bytes.
//! - **Client** ([`ApiClient`]): issues requests over any
//!   [`HttpTransport`](waypoint_transport::HttpTransport) and classifies
//!   the outcome into success or an [`ApiError`].
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (typed, classified) → Session / Progress / Leaderboard
//! ```
//!
//! # Tolerant decoding
//!
//! Response bodies decode leniently: missing fields and JSON `null` take
//! the field's default, so a sparse record still yields its `lastScene`.
//! A value of the wrong type is still a decode error, since that means
//! the backend and client disagree about the protocol.

mod client;
mod codec;
mod error;
mod types;

pub use client::{ApiClient, ApiResponse};
pub use codec::{Codec, JsonCodec};
pub use error::{ApiError, ProtocolError};
pub use types::{
    AuthResponse, CheckpointRequest, Credentials, LeaderboardResponse, ProgressRecord,
    ScoreEntry, ScoreSubmission, paths,
};
