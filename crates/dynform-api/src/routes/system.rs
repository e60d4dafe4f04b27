//! Service information, health and metrics endpoints

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub documentation: String,
    pub available_schemas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub schemas_loaded: usize,
    pub submissions_count: usize,
    pub uptime_seconds: u64,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "Dynamic Form API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documentation: "/api/schemas".to_string(),
        available_schemas: state.schemas.ids(),
    })
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let submissions_count = state.submissions.count().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        schemas_loaded: state.schemas.len(),
        submissions_count,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.metrics.encode_text()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
