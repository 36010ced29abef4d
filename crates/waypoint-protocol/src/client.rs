//! The JSON API client: request building and outcome classification.
//!
//! [`ApiClient`] turns "call this endpoint with this body" into an
//! [`HttpRequest`], hands it to the transport, and classifies whatever
//! comes back into exactly one of: success (2xx, body decoded),
//! [`ApiError::Application`] (non-2xx, raw body kept),
//! [`ApiError::Parse`] (2xx, body didn't decode), or
//! [`ApiError::Transport`] (no response). It never retries; the caller
//! decides what a failure means.

use serde::{Serialize, de::DeserializeOwned};
use waypoint_transport::{Headers, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

use crate::{ApiError, Codec, JsonCodec};

/// A successful (2xx) response with its decoded body.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub headers: Headers,
    pub body: T,
}

/// Issues JSON requests against one backend.
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
    codec: JsonCodec,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Creates a client for `base_url`. A trailing `/` is stripped so paths
    /// can always start with one.
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            codec: JsonCodec,
        }
    }

    /// The backend origin, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The transport requests go through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET path?query`, decoding a 2xx body as `R`.
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        credential: Option<&str>,
    ) -> Result<ApiResponse<R>, ApiError> {
        let mut request = self.build(HttpMethod::Get, path, credential);
        request.query = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let response = self.execute(request).await?;
        self.decode(response)
    }

    /// `POST path` with a JSON body, decoding a 2xx body as `R`.
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&str>,
    ) -> Result<ApiResponse<R>, ApiError> {
        let request = self.build_post(path, body, credential)?;
        let response = self.execute(request).await?;
        self.decode(response)
    }

    /// `POST path` with a JSON body, returning a 2xx body as raw text.
    ///
    /// For endpoints whose acknowledgment is opaque to the client.
    pub async fn post_raw<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&str>,
    ) -> Result<ApiResponse<String>, ApiError> {
        let request = self.build_post(path, body, credential)?;
        let response = self.execute(request).await?;
        let body = response.body_text();
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            body,
        })
    }

    fn build(&self, method: HttpMethod, path: &str, credential: Option<&str>) -> HttpRequest {
        let mut request = HttpRequest::new(method, format!("{}{path}", self.base_url));
        // The credential is forwarded verbatim; absence never blocks a request.
        if let Some(cookie) = credential.filter(|c| !c.is_empty()) {
            request.headers.insert("Cookie", cookie);
        }
        request
    }

    fn build_post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let bytes = self.codec.encode(body).map_err(ApiError::Encode)?;
        let mut request = self.build(HttpMethod::Post, path, credential);
        request
            .headers
            .insert("Content-Type", self.codec.content_type());
        request.body = Some(bytes);
        Ok(request)
    }

    /// Sends the request and separates 2xx from everything else.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "api request");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Application {
                status: response.status,
                body: response.body_text(),
            });
        }
        tracing::debug!(%method, %url, status = response.status, "api success");
        Ok(response)
    }

    fn decode<R: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<R>, ApiError> {
        match self.codec.decode(&response.body) {
            Ok(body) => Ok(ApiResponse {
                status: response.status,
                headers: response.headers,
                body,
            }),
            Err(source) => Err(ApiError::Parse {
                status: response.status,
                body: response.body_text(),
                source,
            }),
        }
    }
}
