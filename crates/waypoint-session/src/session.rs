//! Session types: the record of who is logged in.
//!
//! A "session" is the client's record of an authenticated player:
//! - WHO the player is (`username`)
//! - HOW later requests prove it (an optional opaque `credential`, the
//!   cookie the backend handed out at login)
//! - WHICH session this is (`generation`), so a continuation that started
//!   under one session can tell it is stale once another replaced it

use std::sync::{Arc, PoisonError, RwLock};

/// One authenticated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub credential: Option<String>,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    current: Option<Session>,
    generation: u64,
}

/// Process-wide holder of the current [`Session`].
///
/// This is a cheap, cloneable handle: every clone points at the same
/// slot. The root context creates one at startup and hands clones to each
/// controller, so there is exactly one session per client no matter how
/// many screens come and go.
///
/// Reads and writes go through an `RwLock` that is never held across an
/// `.await`, so readers always see the last completed write.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<StoreState>>,
}

impl SessionStore {
    /// Creates an empty (unauthenticated) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current session, credential included, and returns the
    /// new generation.
    pub fn set_session(&self, username: impl Into<String>, credential: Option<String>) -> u64 {
        let username = username.into();
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        let generation = state.generation;
        tracing::info!(
            %username,
            generation,
            has_credential = credential.is_some(),
            "session established"
        );
        state.current = Some(Session {
            username,
            credential,
            generation,
        });
        generation
    }

    /// A copy of the current session, if any.
    pub fn snapshot(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Who is logged in, if anyone.
    pub fn current_username(&self) -> Option<String> {
        self.snapshot().map(|s| s.username)
    }

    /// The cookie to forward, if the backend issued one.
    pub fn current_credential(&self) -> Option<String> {
        self.snapshot().and_then(|s| s.credential)
    }

    /// The generation of the latest `set_session`; 0 before any login.
    pub fn generation(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Whether any session is set.
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_some()
    }
}
