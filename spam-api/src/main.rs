//! spam-api: HTTP server for the spam classifier
//!
//! Loads the model artifacts once at startup and refuses to start when they
//! are missing.

use clap::Parser;
use spam_api::server::ALLOWED_ORIGINS_ENV;
use spam_api::{cors_layer, router, ApiConfig, AppState};
use spam_rs::{InferenceOptions, InferenceService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spam-api")]
#[command(about = "Serve the spam/ham classifier over HTTP", long_about = None)]
struct Cli {
    /// Configuration file (TOML, optional)
    #[arg(short, long, env = "SPAM_API_CONFIG", default_value = "spam-api.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ApiConfig::load(Some(cli.config.as_path()))?;

    // Initialize logging
    let level = &config.logging.level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("spam_api={level},spam_rs={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting spam-api v{}", env!("CARGO_PKG_VERSION"));

    let service = InferenceService::load(
        &config.model.vectorizer_path,
        &config.model.classifier_path,
        InferenceOptions {
            preprocess_requests: config.model.preprocess_requests,
        },
    )
    .map_err(|e| {
        error!("Failed to load model artifacts: {}", e);
        e
    })?;

    let state = Arc::new(AppState {
        service: Arc::new(service),
        default_threshold: config.model.default_threshold,
    });

    let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV).ok();
    let app = router(state, cors_layer(allowed_origins.as_deref()));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    info!("Server listening on http://{}", config.server.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
