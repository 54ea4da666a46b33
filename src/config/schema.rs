//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! Values are built once at startup and never mutated afterwards.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::{HeaderName, HeaderValue};

use crate::error::ConfigError;

/// The single resource gated behind the authorization cookie.
pub const PROTECTED_PATH: &str = "/secret.txt";

/// Exact `Cookie` header value that unlocks [`PROTECTED_PATH`].
pub const AUTH_COOKIE: &str = "auth=1";

/// Default bind address.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 58081;

/// Root configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the interface to bind to (IP literal or host name).
    pub address: String,

    /// Port to listen on.
    pub port: u16,

    /// Directory served to clients.
    pub root: PathBuf,

    /// Headers appended verbatim to every response.
    pub extra_headers: Vec<ExtraHeader>,

    /// Rule for the `Access-Control-Allow-Origin` value.
    pub origins: OriginPolicy,

    /// Add `Access-Control-Allow-Credentials: true`.
    ///
    /// Has no effect while `origins` is [`OriginPolicy::Disabled`].
    pub allow_credentials: bool,

    /// TLS material; `None` serves plain HTTP.
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
            extra_headers: Vec::new(),
            origins: OriginPolicy::Disabled,
            allow_credentials: false,
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Origin policy deciding the `Access-Control-Allow-Origin` value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OriginPolicy {
    /// No CORS headers are emitted.
    #[default]
    Disabled,
    /// A fixed origin or comma-separated whitelist, sent verbatim.
    Fixed(HeaderValue),
    /// The literal `*`.
    Wildcard,
    /// Echo the request's `Origin` header, or `*` when it is absent.
    Echo,
}

impl OriginPolicy {
    /// Build the policy from the `--origins` / `--all-origins` pair.
    ///
    /// A fixed origin list must be a valid header value.
    pub fn from_args(origins: Option<String>, echo: bool) -> Result<Self, ConfigError> {
        let policy = match (origins, echo) {
            (_, true) => OriginPolicy::Echo,
            (Some(o), false) if o == "*" => OriginPolicy::Wildcard,
            (Some(o), false) => {
                let value = HeaderValue::from_str(&o)
                    .map_err(|_| ConfigError::InvalidHeaderValue(o.clone()))?;
                OriginPolicy::Fixed(value)
            }
            (None, false) => OriginPolicy::Disabled,
        };
        Ok(policy)
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, OriginPolicy::Disabled)
    }

    /// Compute the allowed-origin value for a request carrying `request_origin`.
    ///
    /// Echoed origins are copied byte for byte. Returns `None` when CORS is
    /// disabled.
    pub fn allowed_origin(&self, request_origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        match self {
            OriginPolicy::Disabled => None,
            OriginPolicy::Fixed(origins) => Some(origins.clone()),
            OriginPolicy::Wildcard => Some(HeaderValue::from_static("*")),
            OriginPolicy::Echo => Some(
                request_origin
                    .cloned()
                    .unwrap_or_else(|| HeaderValue::from_static("*")),
            ),
        }
    }
}

impl fmt::Display for OriginPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginPolicy::Disabled => write!(f, "disabled"),
            OriginPolicy::Fixed(origins) => {
                write!(f, "{}", String::from_utf8_lossy(origins.as_bytes()))
            }
            OriginPolicy::Wildcard => write!(f, "*"),
            OriginPolicy::Echo => write!(f, "echo"),
        }
    }
}

/// A `Name: Value` header configured on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraHeader {
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl FromStr for ExtraHeader {
    type Err = ConfigError;

    /// Split on the first colon; spaces following it are not part of the value.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedHeader(raw.to_string()))?;
        let value = value.trim_start_matches(' ');

        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::InvalidHeaderValue(raw.to_string()))?;

        Ok(Self { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_header_strips_spaces_after_colon() {
        let foo: ExtraHeader = "X-Foo: bar".parse().unwrap();
        assert_eq!(foo.name, "x-foo");
        assert_eq!(foo.value, "bar");

        let baz: ExtraHeader = "X-Baz:  qux".parse().unwrap();
        assert_eq!(baz.value, "qux");
    }

    #[test]
    fn extra_header_splits_on_first_colon_only() {
        let h: ExtraHeader = "Link: <https://a.test:8443/x>; rel=preload".parse().unwrap();
        assert_eq!(h.name, "link");
        assert_eq!(h.value, "<https://a.test:8443/x>; rel=preload");
    }

    #[test]
    fn extra_header_allows_empty_value() {
        let h: ExtraHeader = "X-Empty:".parse().unwrap();
        assert_eq!(h.value, "");
    }

    #[test]
    fn extra_header_without_colon_is_rejected() {
        let err = "X-Foo bar".parse::<ExtraHeader>().unwrap_err();
        assert!(matches!(err, ConfigError::MalformedHeader(_)));
    }

    #[test]
    fn extra_header_with_invalid_name_is_rejected() {
        let err = "Bad Name: x".parse::<ExtraHeader>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName(_)));

        let err = ": x".parse::<ExtraHeader>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName(_)));
    }

    #[test]
    fn origin_policy_from_args() {
        assert_eq!(OriginPolicy::from_args(None, false).unwrap(), OriginPolicy::Disabled);
        assert_eq!(OriginPolicy::from_args(None, true).unwrap(), OriginPolicy::Echo);
        assert_eq!(
            OriginPolicy::from_args(Some("*".into()), false).unwrap(),
            OriginPolicy::Wildcard
        );
        assert_eq!(
            OriginPolicy::from_args(Some("https://a.test,https://b.test".into()), false).unwrap(),
            OriginPolicy::Fixed(HeaderValue::from_static("https://a.test,https://b.test"))
        );
    }

    #[test]
    fn unencodable_fixed_origin_is_rejected() {
        let err = OriginPolicy::from_args(Some("https://a.test\n".into()), false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderValue(_)));
    }

    #[test]
    fn origin_policy_allowed_origin() {
        let a = HeaderValue::from_static("http://a.test");
        let star = HeaderValue::from_static("*");

        assert_eq!(OriginPolicy::Disabled.allowed_origin(Some(&a)), None);
        assert_eq!(OriginPolicy::Echo.allowed_origin(Some(&a)), Some(a.clone()));
        assert_eq!(OriginPolicy::Echo.allowed_origin(None), Some(star.clone()));
        assert_eq!(OriginPolicy::Wildcard.allowed_origin(Some(&a)), Some(star));

        let fixed = OriginPolicy::Fixed(HeaderValue::from_static("https://x.test"));
        assert_eq!(fixed.allowed_origin(Some(&a)), Some(HeaderValue::from_static("https://x.test")));
    }

    #[test]
    fn echo_copies_opaque_origin_bytes() {
        let opaque = HeaderValue::from_bytes(b"http://caf\xe9.test").unwrap();
        assert!(opaque.to_str().is_err());
        assert_eq!(OriginPolicy::Echo.allowed_origin(Some(&opaque)), Some(opaque));
    }
}
