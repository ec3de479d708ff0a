use anyhow::Result;
use churn_api::{config, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parses a log level or a full filter directive list (`info`,
/// `churn_api=debug,tower_http=info`)
fn parse_log_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| {
        anyhow::anyhow!(
            "Invalid log filter: '{}' ({}). Use a level such as error, warn, info, debug, trace, or target=level directives",
            filter,
            e
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG overrides the configured level
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    let env_filter = match parse_log_filter(&log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .init();

    info!(
        "Starting churn prediction server v{} with log level: {}",
        env!("CARGO_PKG_VERSION"),
        log_level
    );

    // Fails fast when the model artifact cannot be found or loaded
    server::run(config).await?;

    Ok(())
}
