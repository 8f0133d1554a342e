//! HTTP response building module
//!
//! Provides builders for the status codes the responder emits, decoupled from
//! request handling.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 200 OK response carrying file contents
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Server", server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a plain-text error response such as `404 Not Found`
pub fn build_error_response(
    status: StatusCode,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let text = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let content_length = text.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(text)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", content_length)
        .header("Server", server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = status;
            resp
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(server_name: &str) -> Response<Full<Bytes>> {
    let mut resp = build_error_response(StatusCode::METHOD_NOT_ALLOWED, server_name, false);
    resp.headers_mut().insert(
        hyper::header::ALLOW,
        hyper::header::HeaderValue::from_static(ALLOWED_METHODS),
    );
    resp
}

/// Build OPTIONS response
pub fn build_options_response(server_name: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", ALLOWED_METHODS)
        .header("Server", server_name)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body()
            .collect()
            .await
            .map(http_body_util::Collected::to_bytes)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_file_response_headers_and_body() {
        let resp = build_file_response(b"<h1>hi</h1>".to_vec(), "text/html", "test", false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html");
        assert_eq!(resp.headers()["content-length"], "11");
        assert_eq!(resp.headers()["server"], "test");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"<h1>hi</h1>"));
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_file_response(vec![0u8; 42], "application/octet-stream", "test", true);
        assert_eq!(resp.headers()["content-length"], "42");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_error_response_text() {
        let resp = build_error_response(StatusCode::NOT_FOUND, "test", false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"404 Not Found"));

        let resp = build_error_response(StatusCode::FORBIDDEN, "test", false);
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"403 Forbidden"));
    }

    #[test]
    fn test_405_carries_allow() {
        let resp = build_405_response("test");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], ALLOWED_METHODS);
    }

    #[test]
    fn test_options_response() {
        let resp = build_options_response("test");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["allow"], ALLOWED_METHODS);
    }
}
