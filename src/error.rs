//! Request-level error taxonomy
//!
//! Every failure of the static file responder is terminal for the request
//! and maps to exactly one HTTP status.

use hyper::StatusCode;
use thiserror::Error;

/// Reasons a request path could not be served
#[derive(Debug, Error)]
pub enum ServeError {
    /// Malformed percent-encoding, invalid UTF-8, or an embedded null byte
    #[error("invalid request path")]
    InvalidPath,

    /// The path resolves outside the root directory
    #[error("path escapes the root directory")]
    Forbidden,

    /// Missing target, directory, or other non-regular file
    #[error("file not found")]
    NotFound,

    /// Filesystem failure unrelated to existence (permissions, read errors)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    /// HTTP status code reported to the client
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPath => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify an error returned by the filesystem
    ///
    /// Existence-related kinds collapse into `NotFound`; anything else is a
    /// genuine I/O failure.
    pub fn from_fs(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound
            | std::io::ErrorKind::NotADirectory
            | std::io::ErrorKind::IsADirectory => Self::NotFound,
            _ => Self::Io(err),
        }
    }
}
