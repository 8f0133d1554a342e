//! Request handler module
//!
//! Responsible for request dispatch and the static file responder.

pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
pub use static_files::{serve, StaticFile};
