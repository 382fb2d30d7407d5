//! `GET /health`, JSON for uptime checks

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// `ok` when the pool answers a trivial query
    pub database: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            warn!("Health check could not reach the database: {}", e);
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok",
        module: "fyyur-web",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
