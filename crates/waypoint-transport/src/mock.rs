//! A scripted in-memory transport for tests.
//!
//! Replies are registered per `(method, path)` route. Each route holds a
//! queue: replies are consumed in order, and the last one repeats forever.
//! A request with no matching route fails with
//! [`TransportError::Connect`], so an empty mock behaves like a backend
//! that is down.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Headers, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// One scripted outcome for a route.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A response reaches the client.
    Respond(HttpResponse),
    /// No response reaches the client.
    Unreachable,
    /// The transport times out.
    Timeout,
}

impl MockReply {
    /// A response with the given status and JSON text body.
    pub fn json(status: u16, body: &str) -> Self {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/json");
        Self::Respond(HttpResponse {
            status,
            headers,
            body: body.as_bytes().to_vec(),
        })
    }

    /// A response with a raw text body and no headers.
    pub fn text(status: u16, body: &str) -> Self {
        Self::Respond(HttpResponse {
            status,
            headers: Headers::new(),
            body: body.as_bytes().to_vec(),
        })
    }

    /// Adds a response header. No effect on non-response replies.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let Self::Respond(response) = &mut self {
            response.headers.insert(name, value);
        }
        self
    }
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(HttpMethod, String), Vec<MockReply>>,
    requests: Vec<HttpRequest>,
}

/// A cloneable handle to a scripted transport.
///
/// Clones share the same routes and request log, so a test can keep one
/// handle for assertions while the code under test owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a transport with no routes: every request is unreachable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` for requests whose URL path is `path`.
    pub fn route(self, method: HttpMethod, path: &str, reply: MockReply) -> Self {
        self.push(method, path, reply);
        self
    }

    /// Queues `reply` on an existing handle.
    pub fn push(&self, method: HttpMethod, path: &str, reply: MockReply) {
        self.lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push(reply);
    }

    /// Returns every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Returns the requests sent to `path`, oldest first.
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_reply(&self, request: &HttpRequest) -> Option<MockReply> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        let queue = state
            .routes
            .get_mut(&(request.method, path_of(&request.url).to_string()))?;
        if queue.len() > 1 {
            Some(queue.remove(0))
        } else {
            queue.first().cloned()
        }
    }
}

impl HttpTransport for MockTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let reply = self.next_reply(&request);
        async move {
            match reply {
                Some(MockReply::Respond(response)) => Ok(response),
                Some(MockReply::Timeout) => Err(TransportError::Timeout),
                Some(MockReply::Unreachable) | None => Err(TransportError::Connect(format!(
                    "no route to {} {}",
                    request.method, request.url
                ))),
            }
        }
    }
}

/// Strips scheme and authority: `http://host:1/api/x` → `/api/x`.
fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .find('/')
        .map_or("/", |idx| &without_scheme[idx..])
}
