use std::sync::Arc;

use static_responder::config::{self, AppState, Config};
use static_responder::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sizing the worker pool from configuration
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::from_config(cfg).map_err(|e| {
        logger::log_error(&format!("Invalid root directory: {e}"));
        e
    })?);

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&listener.local_addr()?, &state);

    server::run(listener, state, server::shutdown_signal()).await?;
    Ok(())
}
