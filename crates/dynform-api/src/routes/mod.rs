//! Route definitions and shared handler state

pub mod data;
pub mod forms;
pub mod schemas;
pub mod system;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::registry::SchemaRegistry;
use crate::store::{EmailRegistry, InMemorySubmissionStore, SubmissionStore};
use crate::telemetry::metrics::{self, FormMetrics, MetricsError};

/// State shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub schemas: Arc<SchemaRegistry>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub emails: Arc<EmailRegistry>,
    pub metrics: Arc<FormMetrics>,
    pub started_at: Instant,
}

impl AppState {
    /// State with an in-memory store and the seeded email registry
    pub fn new(schemas: SchemaRegistry) -> Result<Self, MetricsError> {
        Ok(Self {
            schemas: Arc::new(schemas),
            submissions: Arc::new(InMemorySubmissionStore::new()),
            emails: Arc::new(EmailRegistry::default()),
            metrics: Arc::new(FormMetrics::new()?),
            started_at: Instant::now(),
        })
    }

    pub fn with_store(mut self, store: Arc<dyn SubmissionStore>) -> Self {
        self.submissions = store;
        self
    }

    pub fn with_emails(mut self, emails: EmailRegistry) -> Self {
        self.emails = Arc::new(emails);
        self
    }

    /// Metrics label for a form id, collapsing unregistered ids
    pub(crate) fn form_label<'a>(&self, form_id: Option<&'a str>) -> &'a str {
        match form_id {
            Some(id) if self.schemas.get(id).is_some() => id,
            _ => metrics::UNKNOWN_FORM,
        }
    }
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/metrics", get(system::metrics))
        .route("/api/health", get(system::health))
        // Schema delivery
        .route("/api/schemas", get(schemas::list_schemas))
        .route("/api/schemas/:schema_id", get(schemas::get_schema))
        .route(
            "/api/schemas/:schema_id/options/:param",
            get(schemas::dependent_options),
        )
        // Lookup data for dependent fields
        .route("/api/countries", get(data::countries))
        .route("/api/cities", get(data::cities))
        .route("/api/subcategories", get(data::subcategories))
        // Validation and submission
        .route("/api/validate/email", get(data::validate_email))
        .route("/api/validate", post(forms::validate_form))
        .route("/api/submit", post(forms::submit_form))
        .route("/api/submissions", get(forms::list_submissions))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
