// Configuration module entry point
// Loads layered configuration and builds the immutable runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::{AppState, RootDir};
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "server";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources in increasing priority: built-in defaults, the file (if
    /// present), then `SERVER_`-prefixed environment variables such as
    /// `SERVER_SERVER__ROOT=/srv/www`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder(config_path)?
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults plus the optional file, without environment overrides
    fn builder(
        config_path: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.root", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.request_timeout", 30)?
            .set_default("http.server_name", "static-responder")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
