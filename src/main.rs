use std::sync::Arc;

use tower_http::cors::CorsLayer;

use site_checkin::checkin::{CheckInManager, CheckInRouteState, checkin_routes};
use site_checkin::client::{CheckInClient, HttpCheckInClient};
use site_checkin::config::CheckInConfig;
use site_checkin::store::{MemoryStore, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = CheckInConfig::from_env();

    eprintln!("🏗  Site Check-In v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend API: {}", config.api_base_url);
    eprintln!("   Check-in API: http://0.0.0.0:{}/api/check-in", config.port);

    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let client: Arc<dyn CheckInClient> =
        Arc::new(HttpCheckInClient::new(config.api_base_url.clone()));
    let manager = Arc::new(CheckInManager::new(store, client, config.clone()));

    let app = checkin_routes(CheckInRouteState { manager }).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Check-in server started");
    axum::serve(listener, app).await?;

    Ok(())
}
