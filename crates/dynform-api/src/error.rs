//! API error types and the error response envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;
use crate::telemetry::metrics::MetricsError;

/// Errors surfaced by route handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Schema '{id}' not found. Available schemas: {}", .available.join(", "))]
    SchemaNotFound { id: String, available: Vec<String> },

    #[error("Parameter '{param}' not found in schema '{schema}'")]
    ParameterNotFound { schema: String, param: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::SchemaNotFound { .. } | ApiError::ParameterNotFound { .. } => "NOT_FOUND",
            ApiError::Store(_) => "STORAGE_ERROR",
            ApiError::Metrics(_) | ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SchemaNotFound { .. } | ApiError::ParameterNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Metrics(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::SchemaNotFound { available, .. } => {
                Some(serde_json::json!({ "available_schemas": available }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let mut info = ErrorInfo::new(self.error_code(), self.to_string());
        info.details = self.details();

        (status, Json(ErrorResponse::new(info))).into_response()
    }
}

/// Body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorInfo,
    pub metadata: ResponseMetadata,
}

impl ErrorResponse {
    pub fn new(error: ErrorInfo) -> Self {
        Self {
            success: false,
            error,
            metadata: ResponseMetadata::new(),
        }
    }
}

/// Error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code for programmatic handling
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Request metadata attached to error bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub request_id: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub version: String,
}

impl ResponseMetadata {
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for ResponseMetadata {
    fn default() -> Self {
        Self::new()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
