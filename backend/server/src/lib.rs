//! Documentation of the student ID lookup service.
//!
//! Students type their own phone number and a parent's phone number, optionally
//! pick a course and class, and get back the student ID the school assigned them.
//!
//!
//!
//! # General Infrastructure
//! - Single Rust server behind whatever reverse proxy serves the frontend
//! - Student rows live in one JSON file exported from the enrolment spreadsheet
//! - A script deployed next to the spreadsheet turns the sheet into that JSON
//! - Admins (or a cron job) hit `/update` with the shared key to pull a fresh copy
//!
//!
//!
//! # Endpoints
//!
//! ## `GET /courses`
//! - `200 {"courses": [..], "classesByCourse": {course: [..]}}`
//! - `500 {"error", "details"}` when the data file is missing or malformed
//!
//! ## `POST /search`
//! - Body `{"studentPhone", "parentPhone", "course"?, "class"?}`
//! - `200 {"studentId", "enrolledClass"}`
//! - `404 {"error": "Student not found"}`
//! - `500 {"error", "details"}` when the body or the data file cannot be parsed
//!
//! ## `POST /update`
//! - Header `x-api-key` must equal `API_KEY`, otherwise `401` and the file is left alone
//! - `200 {"message": "Data updated successfully"}`
//! - `500 {"error", "details"}` when the script or the write fails
//!
//!
//!
//! # Notes
//!
//! ## No cache
//! The dataset is a few thousand rows at most. Every request reads the file again,
//! which means a refresh is visible to the very next request with no invalidation.
//!
//! ## Refresh races
//! Every refresh writes its own staging file and renames it over the data file, so
//! readers see either the old or the new dataset. Two refreshes at once both succeed
//! and the last rename wins.
//!
//!
//!
//! # Setup
//!
//! Environment.
//! ```sh
//! export APPS_SCRIPT_URL=https://script.google.com/macros/s/<deployment>/exec
//! export API_KEY=<shared secret>
//! export RUST_LOG=info
//! ```
//!
//! Seed a sample dataset and start the server.
//! ```sh
//! cargo run -p tester
//! cargo run -p lookup
//! ```
//!
//! Pull a fresh copy from the spreadsheet without the server.
//! ```sh
//! cargo run -p process -- --map "Class Name=Enrolled Class"
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod courses;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use config::Config;
use routes::{courses_handler, search_handler, update_handler};
use state::State;
use utils::API_KEY_HEADER;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/courses", get(courses_handler))
        .route("/search", post(search_handler))
        .route("/update", post(update_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).context("Failed to build processing service client")?;

    info!("Starting server...");
    info!("Serving students from {}", state.config.data_file.display());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

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
            Ok(mut stream) => {
                stream.recv().await;
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
