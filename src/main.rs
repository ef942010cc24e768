use anyhow::Context;
use augur::config::Config;
use augur::services::{PredictionService, ScorerRegistry};
use augur::sources::build_provider;
use augur::AppState;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Augur server on {}:{}", config.host, config.port);

    // Load per-asset models
    let scorers = ScorerRegistry::load_dir(&config.models_dir).with_context(|| {
        format!("failed to load models from {}", config.models_dir.display())
    })?;
    if scorers.is_empty() {
        warn!(
            "No models found in {}; every prediction will be rejected",
            config.models_dir.display()
        );
    } else {
        info!("Loaded {} models from {}", scorers.len(), config.models_dir.display());
    }

    // Historical price provider
    let provider = build_provider(&config).context("failed to build price provider")?;
    info!("Using {} for historical prices", provider.source());

    let predictor = PredictionService::new(provider, Arc::new(scorers), config.pipeline_settings());
    let state = AppState::new(config.clone(), predictor);
    let app = augur::app(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
