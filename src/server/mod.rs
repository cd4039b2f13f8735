//! HTTP server module for API and WebSocket endpoints.
//!
//! Exposes the derived call statistics to a local frontend and accepts
//! filter configuration changes.

pub mod routes;
pub mod state;
pub mod ws;

use crate::server::routes::{allowlist, calls, config, health, stats};
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

/// Default server port.
pub const DEFAULT_PORT: u16 = 13291;

/// Starts the HTTP server on a background thread.
///
/// Returns a handle to the broadcast sender for pushing updates.
pub fn start_server() -> broadcast::Sender<String> {
    let (tx, _) = broadcast::channel::<String>(100);
    let tx_clone = tx.clone();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
        rt.block_on(async {
            run_server(tx_clone).await;
        });
    });

    tracing::info!(port = DEFAULT_PORT, "HTTP server starting");
    tx
}

/// Runs the axum server.
async fn run_server(broadcast_tx: broadcast::Sender<String>) {
    let state = Arc::new(AppState::new(broadcast_tx));

    // CORS layer for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Derived data API
        .route("/api/calls", get(calls::get_calls))
        .route("/api/buckets", get(stats::get_buckets))
        .route("/api/stats", get(stats::get_stats))
        // Config API
        .route(
            "/api/config",
            get(config::get_config).put(config::put_config),
        )
        .route(
            "/api/allowlist",
            get(allowlist::get_allowlist).put(allowlist::put_allowlist),
        )
        // WebSocket
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));
    tracing::info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
