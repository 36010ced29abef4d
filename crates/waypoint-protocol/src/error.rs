//! Error types for the protocol layer.

use waypoint_transport::TransportError;

/// Errors from encoding or decoding a message body.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing required fields,
    /// or wrong data types.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

/// The classified outcome of a failed API call.
///
/// The variants are disjoint: a call either got no response
/// ([`Transport`](Self::Transport)), got a non-2xx response
/// ([`Application`](Self::Application)), or got a 2xx response whose body
/// did not match the expected schema ([`Parse`](Self::Parse)).
/// [`Encode`](Self::Encode) never reaches the network.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response reached the client (DNS, refused, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The backend answered with a status outside `200..=299`.
    /// `body` is the raw response text, kept for diagnostics.
    #[error("backend returned status {status}")]
    Application { status: u16, body: String },

    /// The backend answered 2xx but the body did not decode.
    #[error("status {status} response did not match the expected schema: {source}")]
    Parse {
        status: u16,
        #[source]
        source: ProtocolError,
        body: String,
    },

    /// The request body could not be serialized.
    #[error("could not encode request: {0}")]
    Encode(#[source] ProtocolError),
}

impl ApiError {
    /// Returns `true` if no response reached the client.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } | Self::Parse { status, .. } => Some(*status),
            Self::Transport(_) | Self::Encode(_) => None,
        }
    }

    /// The raw response body, when a response was received.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Application { body, .. } | Self::Parse { body, .. } => Some(body),
            Self::Transport(_) | Self::Encode(_) => None,
        }
    }
}
