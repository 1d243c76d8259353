//! Axum route handlers for persona generation and review lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::person::Person;
use crate::models::persona::Persona;
use crate::persona::generator::generate_persona;
use crate::persona::reviews::{load_reviews, EmployeeReviewsResponse};
use crate::state::AppState;

/// POST /api/persona
///
/// Body is a Person; only `employee_id` is used. Loads the employee's reviews
/// and asks the model for a persona.
pub async fn handle_generate_persona(
    State(state): State<AppState>,
    Json(person): Json<Person>,
) -> Result<Json<Persona>, AppError> {
    let employee_id = person.employee_id.trim();
    if employee_id.is_empty() {
        return Err(AppError::Validation("employee_id is required".to_string()));
    }

    info!("Generating persona for employee {employee_id}");
    let reviews = load_reviews(&state.search, &state.archive, employee_id).await?;

    let persona = generate_persona(state.llm.as_ref(), &reviews.half_year, &reviews.monthly)
        .await
        .map_err(|e| AppError::Llm(format!("Persona generation failed: {e}")))?;

    Ok(Json(persona))
}

/// GET /api/reviews/:employee_id
pub async fn handle_get_reviews(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeReviewsResponse>, AppError> {
    let employee_id = employee_id.trim();
    if employee_id.is_empty() {
        return Err(AppError::Validation("employee_id is required".to_string()));
    }

    let reviews = load_reviews(&state.search, &state.archive, employee_id).await?;
    Ok(Json(reviews.into()))
}
