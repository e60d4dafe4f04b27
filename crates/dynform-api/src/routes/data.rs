//! Lookup data and remote validation endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use dynform_core::EnumOption;
use serde::Deserialize;

use super::AppState;
use crate::lookup;
use crate::store::EmailCheck;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct SubcategoryQuery {
    pub parent: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// GET /api/countries
pub async fn countries() -> Json<Vec<EnumOption>> {
    Json(lookup::countries())
}

/// GET /api/cities?country=
pub async fn cities(Query(query): Query<CityQuery>) -> Json<Vec<EnumOption>> {
    Json(lookup::cities(&query.country))
}

/// GET /api/subcategories?parent=
pub async fn subcategories(Query(query): Query<SubcategoryQuery>) -> Json<Vec<EnumOption>> {
    Json(lookup::subcategories(&query.parent))
}

/// GET /api/validate/email?email=
pub async fn validate_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Json<EmailCheck> {
    Json(state.emails.check(&query.email).await)
}
