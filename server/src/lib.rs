//! # Cravings Order Backend
//!
//! Small axum service in front of the managed Hasura endpoint. The
//! frontends (customer app, partner dashboard, captain app) never talk to
//! Hasura for order progress directly; they call this service so the status
//! lifecycle rules live in exactly one place.
//!
//! # Surface
//! - `GET /orders/{id}/status` — display-form history plus the derived label
//! - `POST /orders/{id}/status` — move one checkpoint, read-modify-write
//!   through Hasura
//! - `GET /charges/quote` — tiered delivery charge for a distance
//! - `POST /inventory/summary` — fold fetched purchase pages into totals
//!
//! # Notes
//! - Runs behind the reverse proxy, so CORS stays permissive on methods the
//!   routes actually use.
//! - The Hasura admin secret comes from a mounted secret file, env var as
//!   local fallback.

use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use routes::{
    charge_quote_handler, inventory_summary_handler, order_status_handler, set_status_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route(
            "/orders/{id}/status",
            get(order_status_handler).post(set_status_handler),
        )
        .route("/charges/quote", get(charge_quote_handler))
        .route("/inventory/summary", post(inventory_summary_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
