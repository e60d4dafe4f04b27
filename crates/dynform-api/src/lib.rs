//! # dynform-api
//!
//! HTTP service delivering form schemas to clients and validating and
//! storing what they post back.
//!
//! ## Routes
//!
//! - `GET /` service information
//! - `GET /api/schemas`, `GET /api/schemas/:id` schema delivery
//! - `GET /api/schemas/:id/options/:param` dependent option resolution
//! - `GET /api/countries`, `/api/cities`, `/api/subcategories` lookup data
//! - `GET /api/validate/email` email availability
//! - `POST /api/validate`, `POST /api/submit` validation and submission
//! - `GET /api/submissions`, `GET /api/health`, `GET /metrics`

pub mod config;
pub mod error;
pub mod lookup;
pub mod registry;
pub mod routes;
pub mod store;
pub mod telemetry;

pub use config::{ConfigError, LogFormat, ServerConfig};
pub use error::{ApiError, ErrorInfo, ErrorResponse};
pub use registry::{RegistryError, SchemaRegistry};
pub use routes::{create_router, AppState};
pub use store::{
    EmailCheck, EmailRegistry, InMemorySubmissionStore, StoreError, SubmissionFilter,
    SubmissionRecord, SubmissionStore,
};
pub use telemetry::{init_tracing, FormMetrics, MetricsError};
