use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use warren::api::{create_api_router, AppState};
use warren::config::Config;
use warren::enrich::{GeoIpService, HeuristicBotDetector, Tagger, TracingSink, WootheeInspector};
use warren::storage::{ClickHouseStore, LogStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Geo lookups degrade to Unknown when no database is configured
    let geo = Arc::new(GeoIpService::new(config.enrich.geoip_db_path.as_deref())?);
    match &config.enrich.geoip_db_path {
        Some(path) => info!("GeoIP database loaded from {}", path),
        None => info!("GEOIP_DB_PATH not set, country classification disabled"),
    }

    let tagger = Tagger::new(
        geo,
        Arc::new(WootheeInspector::new()),
        Arc::new(HeuristicBotDetector::new()),
    );

    // Initialize the store
    let store: Arc<dyn LogStore> = Arc::new(ClickHouseStore::new(&config.store));
    info!("Using ClickHouse store: {}", config.store.url);

    info!("Initializing store...");
    store.init().await?;
    info!("Store initialized successfully");

    let state = Arc::new(AppState {
        tagger,
        store,
        sink: Arc::new(TracingSink),
    });
    let router = create_api_router(state);

    // Start API server
    let addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 API server listening on http://{}", addr);
    info!("   - Traffic queries at http://{}/api/traffic", addr);
    info!("   - Log ingestion at http://{}/api/ingest", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
