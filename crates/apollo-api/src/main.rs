//! Apollo engagement server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p apollo-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use apollo_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        backend = ?config.database.backend,
        "Configuration loaded"
    );

    // Run the server
    if let Err(e) = apollo_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
