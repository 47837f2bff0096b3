//! Health endpoints: liveness, readiness (DB ping), and a basic status view.

use crate::{db, handlers::AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }

    fn down() -> Self {
        Self {
            status: HealthStatus::Down,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Basic up/down status
async fn health() -> impl IntoResponse {
    Json(HealthResponse::up())
}

/// Liveness: the process is running and serving requests
async fn liveness() -> impl IntoResponse {
    Json(HealthResponse::up())
}

/// Readiness: the service can reach its database
async fn readiness(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match db::check_connection(&state.db).await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::up())),
        Err(err) => {
            warn!("Readiness check failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::down()))
        }
    }
}

/// Creates the router for health endpoints
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}
