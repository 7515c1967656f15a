//! fairhire-web - HTTP backend for the FairHire candidate dashboard
//!
//! Startup order: logging, configuration, database, fixtures, scoring
//! client, router. Configuration and fixture failures are fatal; there is
//! no partial service.

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};

use fairhire_common::{db, Config};
use fairhire_web::fixtures::FixtureStore;
use fairhire_web::scoring::ScoringClient;
use fairhire_web::{build_router, AppState};

/// Interval of the scorer keep-alive ping
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting FairHire backend v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    info!("Scoring service: {}", config.scorer_url);

    let pool = match db::init_database(&config.db_path).await {
        Ok(pool) => {
            info!("✓ Database ready: {}", config.db_path.display());
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let store = match FixtureStore::load(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load fixtures from {}: {}", config.data_dir.display(), e);
            return Err(e.into());
        }
    };

    let scorer = ScoringClient::new(&config.scorer_url)?;

    // Create application state and router
    let state = AppState::new(store, pool, scorer);
    state.scorer.spawn_keep_alive(KEEP_ALIVE_INTERVAL);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("fairhire-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
