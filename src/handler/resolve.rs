//! Request path resolution
//!
//! Turns an untrusted, percent-encoded URL path into a candidate file path
//! under the root directory. Everything here is lexical: no filesystem access
//! happens until the candidate is known to be contained in the root.

use crate::error::ServeError;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Percent-decode a raw URL path
///
/// Fails on invalid UTF-8 after decoding and on embedded null bytes.
pub fn decode_request_path(raw: &str) -> Result<String, ServeError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| ServeError::InvalidPath)?;
    if decoded.contains('\0') {
        return Err(ServeError::InvalidPath);
    }
    Ok(decoded.into_owned())
}

/// Collapse `.` and `..` segments of a decoded path
///
/// Returns the remaining segments, or `Forbidden` as soon as a `..` would
/// climb above the root. Empty segments (leading, trailing or doubled
/// slashes) are dropped.
pub fn normalize_segments(decoded: &str) -> Result<Vec<&str>, ServeError> {
    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ServeError::Forbidden);
                }
            }
            s if s.contains('\\') => {
                // Backslash is a separator on Windows hosts
                return Err(ServeError::InvalidPath);
            }
            s => segments.push(s),
        }
    }
    Ok(segments)
}

/// Whether `candidate` lies inside `root` at a component boundary
///
/// `Path::starts_with` compares whole components, so `/srv/www-evil` is not
/// inside `/srv/www`.
pub fn is_contained(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

/// Collapse `.` and `..` components of an already absolute path
///
/// Used for symlink targets, which never pass through `resolve`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Resolve a raw request path to a candidate absolute path under `root`
pub fn resolve(root: &Path, raw: &str) -> Result<PathBuf, ServeError> {
    let decoded = decode_request_path(raw)?;
    let segments = normalize_segments(&decoded)?;

    let mut candidate = root.to_path_buf();
    candidate.extend(segments);

    if !is_contained(root, &candidate) {
        return Err(ServeError::Forbidden);
    }
    Ok(candidate)
}
