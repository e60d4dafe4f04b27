//! Validation and submission endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use dynform_core::{Submission, ValidationResult, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::AppState;
use crate::error::Result;
use crate::store::{SubmissionFilter, SubmissionRecord};

/// Form id whose accepted submissions register the submitted email
const REGISTRATION_FORM: &str = "user_registration";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionsQuery {
    pub form_id: Option<String>,
}

/// Validate against the named form
///
/// A submission naming no registered form has nothing to be checked
/// against and is reported valid.
fn run_validation(state: &AppState, submission: &Submission) -> ValidationResult {
    let form_id = submission.form_id.as_deref();
    let Some(schema) = form_id.and_then(|id| state.schemas.get(id)) else {
        tracing::debug!(form_id = ?form_id, "No schema registered, skipping validation");
        return ValidationResult::default();
    };

    let label = state.form_label(form_id);
    let report = Validator::new(&schema).with_form_id(label).run(submission);
    let elapsed = Duration::from_micros(report.duration_us);
    state.metrics.record_validation(label, &report.result, elapsed);
    report.result
}

/// POST /api/validate
pub async fn validate_form(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Json<ValidationResult> {
    Json(run_validation(&state, &submission))
}

/// POST /api/submit
pub async fn submit_form(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Result<Json<SubmitResponse>> {
    let result = run_validation(&state, &submission);
    let label = state.form_label(submission.form_id.as_deref()).to_string();

    if !result.valid {
        state.metrics.record_submission(&label, false);
        return Ok(Json(SubmitResponse {
            success: false,
            message: "Form validation failed".to_string(),
            data: Some(serde_json::json!({ "errors": result.errors })),
        }));
    }

    let registration_email = match (submission.form_id.as_deref(), submission.data.get("email")) {
        (Some(REGISTRATION_FORM), Some(Value::String(email))) => Some(email.clone()),
        _ => None,
    };

    let submission_id = state.submissions.append(submission).await?;
    state.metrics.record_submission(&label, true);

    if let Some(email) = registration_email {
        state.emails.register(&email).await;
    }

    tracing::info!(form_id = %label, submission_id, "Submission accepted");

    Ok(Json(SubmitResponse {
        success: true,
        message: "Form submitted successfully".to_string(),
        data: Some(serde_json::json!({ "submissionId": submission_id })),
    }))
}

/// GET /api/submissions?form_id=
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionsQuery>,
) -> Result<Json<Vec<SubmissionRecord>>> {
    let filter = SubmissionFilter {
        form_id: query.form_id.filter(|id| !id.is_empty()),
    };
    Ok(Json(state.submissions.query(&filter).await?))
}
