//! Snack sizing service.
//!
//! Someone photographs a fried snack, a multimodal model guesses what it is and how big, and
//! this server turns that guess into an area or perimeter, keeps a leaderboard for the session
//! and hands back a cheeky remark.
//!
//!
//!
//! # Routes
//!
//! | method | path           | body / query                                  |
//! |--------|----------------|-----------------------------------------------|
//! | POST   | `/analyze`     | `{ "imageData": "data:image/...;base64,..." }` |
//! | POST   | `/calculate`   | `{ "type": "...", ...dimensions }`            |
//! | GET    | `/winners`     |                                               |
//! | GET    | `/leaderboard` | `?limit=N` (default 5, max 50)                |
//! | GET    | `/health`      |                                               |
//!
//! `/analyze` always answers 200 with the same JSON shape. Failures show up in its `error`
//! field, never as an HTTP error.
//!
//!
//!
//! # Session
//!
//! - Everything lives in memory and is gone on restart
//! - One metric convention per deployment (`SNACK_METRIC=area|perimeter`)
//! - The store only grows, the leaderboard view is capped
//!
//!
//!
//! # Setup
//!
//! Run locally.
//! ```sh
//! GEMINI_API_KEY=... RUST_LOG=info cargo run
//! ```
//!
//! Measure one photo without the server.
//! ```sh
//! GEMINI_API_KEY=... cargo run -p vision -- vada.jpg --mode perimeter
//! ```
//!
//! Generate docs in `target/doc/packageName/index.html`.
//! ```sh
//! cargo doc
//! `````
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::ctrl_c;
#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod analysis;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use error::AppError;
use routes::{
    analyze_handler, calculate_handler, health_handler, leaderboard_handler, winners_handler,
};
use state::State;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new()?;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/calculate", post(calculate_handler))
        .route("/winners", get(winners_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
