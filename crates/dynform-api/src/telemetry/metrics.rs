//! Prometheus metrics for form validation and submission
//!
//! - `dynform_validations_total` (counter) by form and result
//! - `dynform_validation_errors_total` (counter) by error code
//! - `dynform_submissions_total` (counter) by form and result
//! - `dynform_validation_duration_seconds` (histogram) by form

use dynform_core::ValidationResult;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Metrics error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Metrics output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, MetricsError>;

/// Label used when a request names no registered form
pub const UNKNOWN_FORM: &str = "unknown";

pub struct FormMetrics {
    registry: Registry,
    validations_total: CounterVec,
    validation_errors_total: CounterVec,
    submissions_total: CounterVec,
    validation_duration_seconds: HistogramVec,
}

impl FormMetrics {
    pub fn new() -> Result<Self> {
        Self::with_registry(Registry::new())
    }

    /// Register all metrics with an existing registry
    pub fn with_registry(registry: Registry) -> Result<Self> {
        let validations_total = CounterVec::new(
            Opts::new("validations_total", "Form validations by result").namespace("dynform"),
            &["form_id", "result"],
        )?;

        let validation_errors_total = CounterVec::new(
            Opts::new(
                "validation_errors_total",
                "Field-level validation errors by code",
            )
            .namespace("dynform"),
            &["code"],
        )?;

        let submissions_total = CounterVec::new(
            Opts::new("submissions_total", "Form submissions by result").namespace("dynform"),
            &["form_id", "result"],
        )?;

        let validation_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "validation_duration_seconds",
                "Submission validation duration in seconds",
            )
            .namespace("dynform")
            .buckets(vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
            &["form_id"],
        )?;

        registry.register(Box::new(validations_total.clone()))?;
        registry.register(Box::new(validation_errors_total.clone()))?;
        registry.register(Box::new(submissions_total.clone()))?;
        registry.register(Box::new(validation_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            validations_total,
            validation_errors_total,
            submissions_total,
            validation_duration_seconds,
        })
    }

    pub fn record_validation(&self, form_id: &str, result: &ValidationResult, elapsed: Duration) {
        let outcome = if result.valid { "valid" } else { "invalid" };
        self.validations_total
            .with_label_values(&[form_id, outcome])
            .inc();
        for error in &result.errors {
            self.validation_errors_total
                .with_label_values(&[error.code.as_str()])
                .inc();
        }
        self.validation_duration_seconds
            .with_label_values(&[form_id])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_submission(&self, form_id: &str, accepted: bool) {
        let outcome = if accepted { "accepted" } else { "rejected" };
        self.submissions_total
            .with_label_values(&[form_id, outcome])
            .inc();
    }

    /// Text exposition for scraping
    pub fn encode_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
