//! HTTP transport abstraction layer for Waypoint.
//!
//! Provides the [`HttpTransport`] trait: one async method that takes an
//! [`HttpRequest`] and returns the raw [`HttpResponse`] or a
//! [`TransportError`] when no response arrived at all. Everything above
//! this layer (JSON, status classification, sessions) works in terms of
//! the trait, so production code runs on reqwest and tests run on an
//! in-memory script.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): [`ReqwestTransport`] backed by `reqwest::Client`
//! - `mock`: [`mock::MockTransport`], a scripted transport for tests

mod error;
#[cfg(feature = "reqwest")]
mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::TransportError;
#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;

use std::fmt;
use std::future::Future;

/// The HTTP methods the backend protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// An ordered list of header pairs with case-insensitive lookup.
///
/// HTTP header names are case-insensitive, and some headers
/// (`Set-Cookie`) legitimately appear more than once, so this is a list
/// rather than a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Creates an empty header list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a header. Existing headers with the same name are kept.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if at least one header named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over all `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of header entries, repeats included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no headers are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

/// An outgoing request, fully described as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    /// Query parameters; the transport percent-encodes them.
    pub query: Vec<(String, String)>,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request with no query, headers, or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Returns the value of query parameter `key`, if set.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response that reached the client, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns `true` for status codes in `200..=299`, the only success range.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// The body as text, with invalid UTF-8 replaced. Used for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends HTTP requests and returns whatever came back.
///
/// Implementations must not retry and must not interpret status codes:
/// a 500 is a perfectly good `Ok(HttpResponse)`. Only "nothing came back"
/// is an `Err`.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → one transport is shared through an `Arc` by every
///   controller, and Tokio may poll their requests on any worker thread.
/// - `'static` → the transport borrows nothing temporary, so a detached
///   task can keep its handle after the caller has moved on.
/// - `impl Future + Send` on `send` → callers can `tokio::spawn` a request
///   without boxing the future.
pub trait HttpTransport: Send + Sync + 'static {
    /// Performs one request.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
