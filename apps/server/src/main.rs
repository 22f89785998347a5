// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-View Server - IFC model viewer backend.
//!
//! Loads one IFC model at a time and lets clients step through a list of
//! category/property filters, each of which decides which elements are
//! visible.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/model` - Upload a model (multipart field `file`)
//! - `GET /api/v1/model` - Loaded model summary
//! - `GET /api/v1/elements/:id/properties` - Property table
//! - `GET|POST /api/v1/filters` - Filter list / add a filter
//! - `POST /api/v1/filters/next`, `POST /api/v1/filters/previous` - Step
//! - `GET /api/v1/visibility` - Visible element ids

use anyhow::Context;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod error;
mod routes;
mod types;

use app::{build_router, AppState};
use config::{Config, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,ifc_view_server=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);

    tracing::info!(
        port = config.port,
        max_file_size_mb = config.max_file_size_mb,
        worker_threads = config.worker_threads,
        empty_result_policy = ?config.empty_result_policy,
        cors_origins = ?config.cors_origins,
        "Starting IFC-View Server"
    );

    // Parsing and queries use rayon
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("failed to initialize rayon thread pool")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
