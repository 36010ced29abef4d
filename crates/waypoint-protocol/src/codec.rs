//! Codec trait and the JSON implementation.
//!
//! A codec converts between Rust types and raw bytes. The API client only
//! needs something that implements [`Codec`]; today that is [`JsonCodec`],
//! since the backend speaks JSON and nothing else.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes request bodies and decodes response bodies.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → the codec lives inside an `Arc<ApiClient>` that
///   detached checkpoint and score tasks share across Tokio's threads.
/// - `'static` → it owns everything it needs, so those tasks can hold it
///   for as long as they run.
///
/// ## Generic methods
///
/// `encode<T: Serialize>` accepts any request body and
/// `decode<T: DeserializeOwned>` produces any response body. The
/// `DeserializeOwned` bound means the decoded value owns its strings
/// instead of borrowing from the response buffer, which is dropped as
/// soon as decoding finishes.
pub trait Codec: Send + Sync + 'static {
    /// The `Content-Type` header value for encoded bodies.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use waypoint_protocol::{Codec, JsonCodec, CheckpointRequest};
///
/// let codec = JsonCodec;
/// let bytes = codec
///     .encode(&CheckpointRequest::new("ana", "3"))
///     .unwrap();
/// let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
/// assert_eq!(json["lastScene"], "3");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
