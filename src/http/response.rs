//! Response header injection.
//!
//! # Responsibilities
//! - Suppress client caching, except for versioned jQuery builds
//! - Append the configured extra headers
//! - Add CORS headers according to the origin policy
//!
//! Runs on every response, including 401 and 404, after the inner handler
//! has produced it and before hyper writes the header block. Headers are
//! appended, so a configured name never replaces one set by the handler.

use std::sync::{Arc, LazyLock};

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, EXPIRES,
            ORIGIN, PRAGMA,
        },
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use regex::Regex;

use crate::config::ServerConfig;
use crate::http::path;

/// jQuery distribution builds, e.g. `/js/jquery-3.7.1.min.js`.
static JQUERY_DIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/jquery-\d+(\.\d+)*(\.min)?\.js$").expect("jQuery pattern is valid")
});

/// Versioned library builds stay cacheable so they are not refetched on every reload.
///
/// Matched against the normalized path, the same form the cookie check uses.
pub fn is_cacheable(request_path: &str) -> bool {
    JQUERY_DIST.is_match(&path::normalize(request_path))
}

/// Middleware that decorates the finished response.
pub async fn inject_headers(
    State(config): State<Arc<ServerConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let origin = req.headers().get(ORIGIN).cloned();

    let mut response = next.run(req).await;
    apply_headers(&config, &path, origin.as_ref(), response.headers_mut());
    response
}

/// Append the injected headers for a request to `path` carrying `origin`.
pub fn apply_headers(
    config: &ServerConfig,
    path: &str,
    origin: Option<&HeaderValue>,
    headers: &mut HeaderMap,
) {
    if !is_cacheable(path) {
        headers.append(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.append(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.append(EXPIRES, HeaderValue::from_static("0"));
    }

    for extra in &config.extra_headers {
        headers.append(extra.name.clone(), extra.value.clone());
    }

    let Some(allowed) = config.origins.allowed_origin(origin) else {
        return;
    };
    headers.append(ACCESS_CONTROL_ALLOW_ORIGIN, allowed);

    if config.allow_credentials {
        headers.append(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtraHeader, OriginPolicy};

    fn headers_for(config: &ServerConfig, path: &str, origin: Option<&str>) -> HeaderMap {
        let origin = origin.map(|o| HeaderValue::from_str(o).unwrap());
        let mut headers = HeaderMap::new();
        apply_headers(config, path, origin.as_ref(), &mut headers);
        headers
    }

    #[test]
    fn jquery_builds_are_cacheable() {
        assert!(is_cacheable("/jquery-3.7.1.js"));
        assert!(is_cacheable("/static/js/jquery-3.7.1.min.js"));
        assert!(is_cacheable("/jquery-3.js"));

        assert!(!is_cacheable("/jquery.js"));
        assert!(!is_cacheable("/jquery-latest.js"));
        assert!(!is_cacheable("/jquery-3.7.1.min.js.map"));
        assert!(!is_cacheable("/app.js"));
        assert!(!is_cacheable("jquery-3.7.1.js"));
    }

    #[test]
    fn jquery_match_uses_normalized_path() {
        assert!(is_cacheable("/lib/jquery-3.7.1%2Emin.js"));
        assert!(is_cacheable("//lib/./jquery-3.7.1.min.js"));
        assert!(!is_cacheable("/lib/jquery%2Dlatest.js"));
    }

    #[test]
    fn cache_suppression_values() {
        let headers = headers_for(&ServerConfig::default(), "/index.html", None);
        assert_eq!(headers[CACHE_CONTROL], "no-cache, no-store, must-revalidate");
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[EXPIRES], "0");

        let headers = headers_for(&ServerConfig::default(), "/lib/jquery-1.12.4.min.js", None);
        assert!(!headers.contains_key(CACHE_CONTROL));
        assert!(!headers.contains_key(PRAGMA));
        assert!(!headers.contains_key(EXPIRES));
    }

    #[test]
    fn extra_headers_are_appended() {
        let config = ServerConfig {
            extra_headers: vec![
                "X-Foo: bar".parse::<ExtraHeader>().unwrap(),
                "X-Foo: again".parse::<ExtraHeader>().unwrap(),
            ],
            ..ServerConfig::default()
        };

        let headers = headers_for(&config, "/", None);
        let values: Vec<_> = headers.get_all("x-foo").iter().collect();
        assert_eq!(values, ["bar", "again"]);
    }

    #[test]
    fn cors_disabled_ignores_credentials() {
        let config = ServerConfig {
            allow_credentials: true,
            ..ServerConfig::default()
        };

        let headers = headers_for(&config, "/", Some("http://a.test"));
        assert!(!headers.contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
        assert!(!headers.contains_key(ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }

    #[test]
    fn cors_echo() {
        let config = ServerConfig {
            origins: OriginPolicy::Echo,
            ..ServerConfig::default()
        };

        let headers = headers_for(&config, "/", Some("http://a.test"));
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "http://a.test");
        assert!(!headers.contains_key(ACCESS_CONTROL_ALLOW_CREDENTIALS));

        let headers = headers_for(&config, "/", None);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn cors_echo_keeps_opaque_origin() {
        let config = ServerConfig {
            origins: OriginPolicy::Echo,
            ..ServerConfig::default()
        };
        let origin = HeaderValue::from_bytes(b"http://caf\xe9.test").unwrap();

        let mut headers = HeaderMap::new();
        apply_headers(&config, "/", Some(&origin), &mut headers);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], origin);
    }

    #[test]
    fn cors_fixed_with_credentials() {
        let config = ServerConfig {
            origins: OriginPolicy::Fixed(HeaderValue::from_static("https://x.test")),
            allow_credentials: true,
            ..ServerConfig::default()
        };

        let headers = headers_for(&config, "/", Some("http://other.test"));
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://x.test");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
