//! Request observation.
//!
//! # Responsibilities
//! - Assign each request a process-unique ID for log correlation
//! - Dump the request line, headers and (when framed by Content-Length) the
//!   body before any other processing
//!
//! Logging must never break serving: a body that cannot be read is dropped
//! from the dump and the request continues with an empty body.

use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request},
    http::{header::CONTENT_LENGTH, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

/// Relaxed ordering is sufficient since we only need uniqueness.
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Generate a new unique request ID.
    pub fn new() -> Self {
        Self(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Middleware that logs every request, whatever its method or path.
pub async fn log_request(req: Request, next: Next) -> Response {
    let request_id = RequestId::new();
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        peer = ?peer,
    );

    async move {
        let (parts, body) = req.into_parts();

        let (logged, body) = match content_length(&parts) {
            Some(length) => match axum::body::to_bytes(body, length).await {
                Ok(bytes) => (Some(bytes.clone()), Body::from(bytes)),
                Err(e) => {
                    tracing::debug!(error = %e, "Request body unreadable; not logged");
                    (None, Body::empty())
                }
            },
            None => (None, body),
        };

        tracing::info!("\n{}", render_request(&parts, logged.as_ref()));

        next.run(Request::from_parts(parts, body)).await
    }
    .instrument(span)
    .await
}

/// Declared body length, if the header is present and a valid integer.
fn content_length(parts: &Parts) -> Option<usize> {
    parts
        .headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Render the request as the delimited block written to the log.
fn render_request(parts: &Parts, body: Option<&Bytes>) -> String {
    let mut out = String::from("----- Request Start ----->\n\n");

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let _ = writeln!(out, "{} {} {:?}", parts.method, target, parts.version);

    for (name, value) in &parts.headers {
        let _ = writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    out.push('\n');

    if let Some(body) = body {
        let _ = writeln!(out, "{}", String::from_utf8_lossy(body));
    }

    out.push_str("<----- Request End -----\n");
    out
}
