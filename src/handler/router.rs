//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, the single
//! static-file route, error-to-status conversion and access logging.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub server_name: &'a str,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read; only the head is kept past this point.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);
    let method = &parts.method;

    let ctx = RequestContext {
        path: parts.uri.path(),
        is_head: *method == Method::HEAD,
        server_name: &state.config.http.server_name,
    };

    let response = match *method {
        Method::GET | Method::HEAD => serve_static(&ctx, &state).await,
        Method::OPTIONS => http::build_options_response(ctx.server_name),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response(ctx.server_name)
        }
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_string(&parts.headers, "referer");
        entry.user_agent = header_string(&parts.headers, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Serve the request path from the root directory
async fn serve_static(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match static_files::serve(state.root.path(), ctx.path).await {
        Ok(file) => http::build_file_response(
            file.content,
            file.content_type,
            ctx.server_name,
            ctx.is_head,
        ),
        Err(err) => {
            log_serve_error(ctx.path, &err);
            http::build_error_response(err.status_code(), ctx.server_name, ctx.is_head)
        }
    }
}

fn log_serve_error(path: &str, err: &ServeError) {
    match err {
        ServeError::Forbidden => {
            logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        }
        ServeError::InvalidPath => {
            logger::log_warning(&format!("Invalid request path: {path}"));
        }
        // File not found is common (404), no need to log at warning level
        ServeError::NotFound => logger::log_debug(&format!("Not found: {path}")),
        ServeError::Io(e) => logger::log_error(&format!("Failed to read '{path}': {e}")),
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
