//! Request path helpers shared by the access check and the file handler.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Percent-decode a request path. Paths that do not decode to UTF-8 are
/// returned unchanged.
pub fn decode(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

/// Canonical form of a request path as the file service resolves it:
/// decoded, with empty and `.` segments dropped and no trailing slash.
///
/// `..` segments are kept so they never compare equal to a real path.
pub fn normalize(request_path: &str) -> String {
    let decoded = decode(request_path);
    let mut normalized = String::with_capacity(decoded.len());

    for segment in decoded.split('/').filter(|s| !s.is_empty() && *s != ".") {
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Map a request path onto `root`.
///
/// Returns `None` for paths that try to leave the root (`..`) or carry
/// platform separators; those are left to the file service to reject.
pub fn resolve_under(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = decode(request_path);
    let mut resolved = root.to_path_buf();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => resolved.push(s),
        }
    }

    Some(resolved)
}
