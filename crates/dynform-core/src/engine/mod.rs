//! Submission validation engine
//!
//! The engine walks a schema's parameters in declaration order and applies
//! the rule families that match each parameter's content. Validation is
//! deterministic and never mutates the schema or the submission.

pub mod rules;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

use crate::model::{Content, Parameter, Schema};
use crate::submission::{Submission, ValidationError, ValidationResult};
use rules::ErrorSink;

/// Validate a submission against a schema
pub fn validate(schema: &Schema, submission: &Submission) -> ValidationResult {
    validate_data(schema, &submission.data)
}

/// Validate a bare field map against a schema
pub fn validate_data(schema: &Schema, data: &Map<String, Value>) -> ValidationResult {
    let mut errors = Vec::new();
    for param in schema.parameters() {
        check_parameter(param, data, &mut errors);
    }
    ValidationResult::from_errors(errors)
}

fn check_parameter(param: &Parameter, data: &Map<String, Value>, errors: &mut Vec<ValidationError>) {
    let mut sink = ErrorSink::new(param, errors);

    if !rules::required::check(&mut sink, param.required, &param.name, data) {
        return;
    }
    let Some(value) = data.get(&param.name) else {
        return;
    };

    match &param.content {
        Content::String(content) => rules::string::check(&mut sink, content, value),
        Content::Number(content) => rules::number::check(&mut sink, content, value),
        Content::Enum(_)
        | Content::DependentEnum(_)
        | Content::Date(_)
        | Content::Range(_)
        | Content::Boolean(_) => {}
    }
}

/// Summary of one validation run with timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub result: ValidationResult,
    /// Parameters visited
    pub parameters_checked: usize,
    /// Distinct parameters with at least one error
    pub parameters_failed: usize,
    pub duration_us: u64,
}

/// Validator bound to one schema, instrumented for logging
pub struct Validator<'a> {
    schema: &'a Schema,
    form_id: Option<&'a str>,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            form_id: None,
        }
    }

    /// Label runs with a form identifier in log output
    pub fn with_form_id(mut self, form_id: &'a str) -> Self {
        self.form_id = Some(form_id);
        self
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    pub fn validate(&self, submission: &Submission) -> ValidationResult {
        self.run(submission).result
    }

    /// Validate and report counts and elapsed time
    pub fn run(&self, submission: &Submission) -> ValidationReport {
        let span = tracing::debug_span!(
            "validate",
            form_id = self.form_id.unwrap_or("-"),
            fields = submission.data.len()
        );
        let _guard = span.enter();

        let start = Instant::now();
        let result = validate(self.schema, submission);
        let report = finalize(self.schema, result, start.elapsed());

        tracing::debug!(
            valid = report.result.valid,
            errors = report.result.errors.len(),
            duration_us = report.duration_us,
            "Validation complete"
        );
        report
    }
}

fn finalize(schema: &Schema, result: ValidationResult, elapsed: Duration) -> ValidationReport {
    let mut failed: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
    failed.sort_unstable();
    failed.dedup();
    let parameters_failed = failed.len();

    ValidationReport {
        parameters_checked: schema.parameter_count(),
        parameters_failed,
        duration_us: elapsed.as_micros() as u64,
        result,
    }
}
