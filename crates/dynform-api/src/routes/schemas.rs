//! Schema delivery endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use dynform_core::{Content, Schema};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::AppState;
use crate::error::{ApiError, Result};

fn lookup(state: &AppState, schema_id: &str) -> Result<Arc<Schema>> {
    state
        .schemas
        .get(schema_id)
        .ok_or_else(|| ApiError::SchemaNotFound {
            id: schema_id.to_string(),
            available: state.schemas.ids(),
        })
}

/// GET /api/schemas - form id to schema URL
pub async fn list_schemas(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    Json(
        state
            .schemas
            .ids()
            .into_iter()
            .map(|id| {
                let url = format!("/api/schemas/{}", id);
                (id, url)
            })
            .collect(),
    )
}

/// GET /api/schemas/:schema_id
pub async fn get_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
) -> Result<Json<Value>> {
    let schema = lookup(&state, &schema_id)?;
    Ok(Json(schema.to_value()))
}

/// GET /api/schemas/:schema_id/options/:param
///
/// The query string carries the current form values; the response says
/// whether the options are static, must be fetched, or await a parent value.
pub async fn dependent_options(
    State(state): State<AppState>,
    Path((schema_id, param)): Path<(String, String)>,
    Query(values): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let schema = lookup(&state, &schema_id)?;
    let parameter = schema
        .parameter(&param)
        .ok_or_else(|| ApiError::ParameterNotFound {
            schema: schema_id.clone(),
            param: param.clone(),
        })?;

    let Content::DependentEnum(content) = &parameter.content else {
        return Err(ApiError::BadRequest(format!(
            "Parameter '{}' has content type '{}', not dependent_enum",
            param,
            parameter.content.type_tag()
        )));
    };

    let data: Map<String, Value> = values
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    let resolution = serde_json::to_value(content.resolve(&data))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(resolution))
}
