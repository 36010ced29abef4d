//! Error types for the session layer.

use std::fmt;

use waypoint_protocol::ApiError;

/// Which auth endpoint a request went to. Only affects messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Signup,
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Signup => write!(f, "signup"),
        }
    }
}

/// Errors that can occur while logging in or signing up.
///
/// None of these modify the current session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Bad local input. Never reaches the network.
    #[error("username and password are required")]
    Validation,

    /// No response reached the client.
    #[error("{action} network error: {source}")]
    Network {
        action: AuthAction,
        #[source]
        source: ApiError,
    },

    /// The backend answered with a non-2xx status.
    #[error("{action} rejected: {source}")]
    Rejected {
        action: AuthAction,
        #[source]
        source: ApiError,
    },
}

impl AuthError {
    /// The text shown to the player.
    ///
    /// Network and credential failures read differently, but the retry
    /// policy is the same for both: the player clicks again.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please enter username and password.",
            Self::Network { .. } => "Network error. Please try again.",
            Self::Rejected {
                action: AuthAction::Login,
                ..
            } => "Login failed. Check username/password.",
            Self::Rejected {
                action: AuthAction::Signup,
                ..
            } => "Signup failed. Check username/password.",
        }
    }
}
