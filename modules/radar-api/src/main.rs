use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use radar_common::Config;
use radar_store::RadarStore;
use radar_worker::{bootstrap, Scheduler};

mod rest;

pub struct AppState {
    pub store: Arc<RadarStore>,
    pub scheduler: Arc<Scheduler>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("radar_api=info".parse()?)
                .add_directive("radar_worker=info".parse()?),
        )
        .init();

    let config = Config::from_env();
    let runtime = bootstrap::bootstrap(&config).await?;

    // The scan loop lives in the same process as the read API, so
    // on-demand scans share the store and the rate-limited clients.
    let scheduler = Arc::clone(&runtime.scheduler);
    tokio::spawn(async move {
        scheduler.run_forever().await;
    });

    let state = Arc::new(AppState {
        store: Arc::clone(&runtime.store),
        scheduler: Arc::clone(&runtime.scheduler),
    });

    let app = Router::new()
        // Health check
        .route("/api/health", get(rest::api_health))
        // Read surface
        .route("/api/venues", get(rest::api_venues))
        .route("/api/regions/{region}", get(rest::api_region_ranking))
        // On-demand scans
        .route("/api/scan", post(rest::api_scan))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Venue radar API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
