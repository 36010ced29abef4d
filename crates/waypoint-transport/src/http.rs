//! HTTP transport implementation using `reqwest`.

use std::future::Future;
use std::time::Duration;

use crate::{Headers, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// An [`HttpTransport`] backed by a shared `reqwest::Client`.
///
/// `reqwest::Client` pools connections internally and is cheap to clone,
/// so one transport serves every request the process makes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default timeouts.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(None)
    }

    /// Creates a transport whose requests fail with
    /// [`TransportError::Timeout`] after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an already-configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let client = self.client.clone();
        async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            };

            let url = reqwest::Url::parse(&request.url)
                .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", request.url)))?;

            let mut builder = client.request(method, url);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            for (name, value) in request.headers.iter() {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            tracing::debug!(method = %request.method, url = %request.url, "sending request");

            let response = builder.send().await.map_err(classify)?;

            let status = response.status().as_u16();
            let headers: Headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response.bytes().await.map_err(classify)?.to_vec();

            tracing::debug!(status, bytes = body.len(), "received response");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

/// Maps a reqwest failure onto the transport taxonomy.
fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_builder() {
        TransportError::InvalidUrl(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}
