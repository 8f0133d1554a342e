//! Static file server
//!
//! Serves files below a single root directory over HTTP/1.1. Every request
//! path is decoded, normalized and checked for containment before the
//! filesystem is touched.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use crate::config::{AppState, Config, RootDir};
pub use crate::error::ServeError;
pub use crate::handler::{serve, StaticFile};
