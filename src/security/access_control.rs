//! Access Control Middleware.
//! Gates the protected path behind the authorization cookie.

use axum::{
    extract::Request,
    http::{header::COOKIE, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::{AUTH_COOKIE, PROTECTED_PATH};
use crate::http::path;

/// Methods that go through the file handler and therefore the cookie check.
fn is_checked(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::POST | Method::OPTIONS
    )
}

/// Whether the request may proceed to file serving.
///
/// Only the protected path is checked, after the same normalization the
/// file service applies, and only against the first `Cookie` header,
/// compared byte for byte.
pub fn is_authorized(req: &Request) -> bool {
    if path::normalize(req.uri().path()) != PROTECTED_PATH {
        return true;
    }

    req.headers()
        .get(COOKIE)
        .is_some_and(|cookie| cookie.as_bytes() == AUTH_COOKIE.as_bytes())
}

pub async fn access_control_middleware(req: Request, next: Next) -> Response {
    if !is_checked(req.method()) || is_authorized(&req) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "Missing or wrong auth cookie");
    StatusCode::UNAUTHORIZED.into_response()
}
