//! Progress synchronization for Waypoint.
//!
//! Decides, at every entry point, whether the player resumes from the
//! backend's checkpoint, from the local save signal, or from a fresh
//! start, and records checkpoints as scenes are entered.
//!
//! # Key types
//!
//! - [`ProgressSync`]: the controller (fetch-on-auth, new game, resume,
//!   checkpoint writes)
//! - [`MarkerStore`]: existence-only local save markers
//!   ([`MemoryMarkerStore`], [`FileMarkerStore`])
//! - [`SceneLoader`]: where scene transitions go
//! - [`MenuState`], [`SceneTransition`]: the decisions it hands back

mod error;
mod marker;
mod scene;
mod sync;

pub use error::{MarkerError, ProgressError};
pub use marker::{FileMarkerStore, MarkerStore, MemoryMarkerStore};
pub use scene::SceneLoader;
pub use sync::{
    MenuState, ProgressSync, ResumeSignal, SceneTransition, SyncConfig, TransitionOrigin,
};
