//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! filesystem side of request handling.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_405_response, build_error_response, build_file_response, build_options_response,
};
