use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use parley::{ChatEngine, Config, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = parley::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        parley::logging::init_console_only(&config.logging.level);
    }

    info!("parley - real-time chat server");

    let engine = Arc::new(Mutex::new(ChatEngine::new(&config.chat)));

    let server = match WebServer::new(&config.server, engine) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to configure server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
