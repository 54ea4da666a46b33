//! Static file serving.
//!
//! # Responsibilities
//! - Map request methods onto file semantics (POST as GET, OPTIONS as HEAD)
//! - Delegate file resolution, content types and conditional requests to
//!   `tower_http::services::ServeDir`
//! - Render an HTML listing for directories without an `index.html`
//!
//! Other methods answer 501, the way a plain file server treats methods it
//! has no handler for.

use std::io;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::http::path;
use crate::http::server::AppState;

/// File service rooted at the configured document root.
#[derive(Clone)]
pub struct StaticFiles {
    root: PathBuf,
    serve_dir: ServeDir,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let serve_dir = ServeDir::new(&root).append_index_html_on_directories(true);
        Self { root, serve_dir }
    }

    /// Serve `req` from the document root.
    pub async fn serve(&self, req: Request) -> Response {
        let requested = req.method().clone();
        let (mut parts, body) = req.into_parts();

        parts.method = match requested {
            Method::GET | Method::POST => Method::GET,
            Method::HEAD | Method::OPTIONS => Method::HEAD,
            _ => return not_implemented(&requested),
        };
        let head_only = parts.method == Method::HEAD;
        let req = Request::from_parts(parts, body);

        let listing = self.listing(req.uri().path(), head_only).await;
        let mut response = match listing {
            Some(listing) => listing,
            None => match self.serve_dir.clone().oneshot(req).await {
                Ok(response) => response.map(Body::new),
                Err(never) => match never {},
            },
        };

        // Hyper only suppresses the body for real HEAD requests; an OPTIONS
        // answer must not announce bytes it never sends.
        if requested == Method::OPTIONS {
            response.headers_mut().remove(CONTENT_LENGTH);
        }

        response
    }

    /// Directory listing for `request_path`, if it names a directory that
    /// `ServeDir` would otherwise answer with 404.
    async fn listing(&self, request_path: &str, head_only: bool) -> Option<Response> {
        if !request_path.ends_with('/') {
            return None;
        }

        let dir = path::resolve_under(&self.root, request_path)?;
        if !tokio::fs::metadata(&dir).await.ok()?.is_dir() {
            return None;
        }
        if tokio::fs::metadata(dir.join("index.html"))
            .await
            .is_ok_and(|m| m.is_file())
        {
            return None;
        }

        let response = match read_entries(&dir).await {
            Ok(entries) => {
                let html = render_listing(&path::decode(request_path), &entries);
                html_response(html, head_only)
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Cannot list directory");
                (StatusCode::NOT_FOUND, "No permission to list directory").into_response()
            }
        };

        Some(response)
    }
}

/// Fallback handler serving every path from the document root.
pub async fn serve_static(State(state): State<AppState>, req: Request) -> Response {
    state.files.serve(req).await
}

fn not_implemented(method: &Method) -> Response {
    tracing::debug!(method = %method, "Unsupported method");
    (
        StatusCode::NOT_IMPLEMENTED,
        format!("Unsupported method ({method})"),
    )
        .into_response()
}

fn html_response(html: String, head_only: bool) -> Response {
    let length = html.len();
    let body = if head_only { Body::empty() } else { Body::from(html) };

    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

async fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        let is_dir = if is_symlink {
            tokio::fs::metadata(entry.path())
                .await
                .is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

fn render_listing(display_path: &str, entries: &[Entry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in entries {
        let mut href = urlencoding::encode(&entry.name).into_owned();
        let mut display = entry.name.clone();
        if entry.is_dir {
            href.push('/');
            display.push('/');
        }
        if entry.is_symlink {
            display.push('@');
        }
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            href,
            escape_html(&display)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
