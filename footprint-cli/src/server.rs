//! HTTP endpoint
//!
//! `GET /analyze/{identifier}` runs one stateless query and returns the
//! report as JSON. `GET /health` reports the registry size.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use footprint_core::{Registry, Report};
use footprint_runtime::Engine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub registry: Arc<Registry>,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    platforms: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        platforms: state.registry.len(),
    })
}

async fn analyze(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Json<Report> {
    info!("Analyze request for '{}'", identifier);
    Json(state.engine.analyze(&state.registry, &identifier).await)
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze/{identifier}", get(analyze))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    println!("🌐 Listening on http://{}", addr);
    println!("   Try: curl http://{}/analyze/<identifier>", addr);

    axum::serve(listener, build_app(state))
        .await
        .context("server error")
}
