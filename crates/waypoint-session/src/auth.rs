//! The auth controller: login/signup against the backend.
//!
//! ```text
//!            login()/signup()
//!   Idle ─────────────────────→ AwaitingResponse ──(2xx)──→ Authenticated
//!                                  │      ↑                      │
//!                        (no response/non-2xx)                   │
//!                                  ↓      │  login()/signup()    │
//!                                Failed ──┘←─────────────────────┘
//! ```
//!
//! Every click is a fresh attempt: there is no retry, no cool-down, and
//! no backoff. Input is validated locally first, so an empty field never
//! costs a round trip.

use std::sync::Arc;

use waypoint_protocol::{ApiClient, ApiError, AuthResponse, Codec, Credentials, JsonCodec, paths};
use waypoint_transport::{Headers, HttpTransport};

use crate::{AuthAction, AuthError, Session, SessionStore};

/// Where the controller is in the auth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    AwaitingResponse,
    Authenticated { username: String },
    /// `message` is ready to show to the player.
    Failed { message: String },
}

/// Drives signup and login, and populates the [`SessionStore`] on success.
pub struct AuthController<T> {
    api: Arc<ApiClient<T>>,
    sessions: SessionStore,
    state: AuthState,
}

impl<T: HttpTransport> AuthController<T> {
    /// Creates a controller that writes into `sessions` on success.
    pub fn new(api: Arc<ApiClient<T>>, sessions: SessionStore) -> Self {
        Self {
            api,
            sessions,
            state: AuthState::Idle,
        }
    }

    /// Where the last login or signup attempt left off.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// The store this controller writes into.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Logs in via `POST /api/auth/login`.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.authenticate(AuthAction::Login, username, password).await
    }

    /// Creates an account via `POST /api/auth/signup`. A successful signup
    /// also establishes the session.
    pub async fn signup(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.authenticate(AuthAction::Signup, username, password).await
    }

    async fn authenticate(
        &mut self,
        action: AuthAction,
        username: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let credentials = match validate(username, password) {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::warn!(%action, "username or password is empty");
                return Err(self.fail(e));
            }
        };

        self.state = AuthState::AwaitingResponse;
        let path = match action {
            AuthAction::Login => paths::LOGIN,
            AuthAction::Signup => paths::SIGNUP,
        };

        let ack = match self.api.post_raw(path, &credentials, None).await {
            Ok(ack) => ack,
            Err(source) => {
                tracing::warn!(
                    %action,
                    status = source.status(),
                    body = source.raw_body().unwrap_or_default(),
                    error = %source,
                    "authentication failed"
                );
                let err = match source {
                    ApiError::Transport(_) => AuthError::Network { action, source },
                    _ => AuthError::Rejected { action, source },
                };
                return Err(self.fail(err));
            }
        };

        // The body is informational only; a 2xx is a success even when
        // the body is not the documented shape.
        match JsonCodec.decode::<AuthResponse>(ack.body.as_bytes()) {
            Ok(res) => {
                if let Some(backend_error) = res.error.as_deref() {
                    tracing::warn!(
                        %action,
                        backend_error,
                        "2xx auth response carried an error field"
                    );
                }
                tracing::debug!(%action, message = res.message.as_deref(), "auth response");
            }
            Err(e) => {
                tracing::debug!(%action, error = %e, "auth response body ignored");
            }
        }

        let credential = extract_session_credential(&ack.headers);
        let Credentials { username, .. } = credentials;
        let generation = self.sessions.set_session(username.clone(), credential.clone());
        tracing::info!(%action, %username, "authentication succeeded");

        self.state = AuthState::Authenticated {
            username: username.clone(),
        };
        Ok(Session {
            username,
            credential,
            generation,
        })
    }

    fn fail(&mut self, err: AuthError) -> AuthError {
        self.state = AuthState::Failed {
            message: err.user_message().to_string(),
        };
        err
    }
}

/// Trims both fields and rejects empties.
fn validate(username: &str, password: &str) -> Result<Credentials, AuthError> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::Validation);
    }
    Ok(Credentials::new(username, password))
}

/// Pulls the session token out of a `Set-Cookie` response header.
///
/// The header name is matched case-insensitively and the token is the
/// value up to the first `;` (cookie attributes such as `Path` and
/// `HttpOnly` are dropped). No header, or an empty token, means the
/// backend is running stateless and the session has no credential.
pub fn extract_session_credential(headers: &Headers) -> Option<String> {
    headers.get_all("set-cookie").find_map(|value| {
        let token = value.split(';').next().unwrap_or_default().trim();
        (!token.is_empty()).then(|| token.to_string())
    })
}
