//! Meeting Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p meet-gateway
//! ```
//!
//! Configuration is loaded from environment variables. Without
//! `DATABASE_URL` the server keeps everything in memory.

use meet_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration before tracing so the environment picks the format
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.gateway.address(),
        persistent = config.database.is_some(),
        "Configuration loaded"
    );

    if let Err(e) = meet_gateway::run(config).await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}
