/// Errors that can occur in the transport layer.
///
/// Every variant means the same thing to callers: no HTTP response
/// reached us. A response with a bad status code is NOT a transport
/// error; that classification happens one layer up.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request URL could not be built or parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The remote host could not be reached (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The transport gave up waiting for a response.
    #[error("request timed out")]
    Timeout,

    /// The request failed mid-flight (reset, truncated body, bad header).
    #[error("request failed: {0}")]
    Request(String),
}
