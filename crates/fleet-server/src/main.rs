//! Fleet server - drone registry backend with control-lock arbitration

use anyhow::Result;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_server::api;
use fleet_server::config::Config;
use fleet_server::persistence::{init_database, DroneRepository};
use fleet_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fleet_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting fleet server...");

    let config = Config::from_env();
    let db = init_database(&config.database_path, config.database_max_connections).await?;
    let state = Arc::new(AppState::new(DroneRepository::new(db.pool().clone())));

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
