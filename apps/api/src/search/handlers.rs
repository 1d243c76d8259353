//! Axum route handlers for employee search.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::person::ScoredPerson;
use crate::state::AppState;

/// The part of a persona the federated search needs: its skill names.
#[derive(Debug, Deserialize)]
pub struct PersonaQuery {
    #[serde(default)]
    pub skills: Vec<SkillQuery>,
}

#[derive(Debug, Deserialize)]
pub struct SkillQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FindPersonRequest {
    pub persona: PersonaQuery,
}

#[derive(Debug, Serialize)]
pub struct FindPersonResponse {
    pub result: Vec<ScoredPerson>,
    pub count: usize,
}

/// GET /api/people/:query
///
/// Free-text search over the employee directory. 404 when nothing matches.
pub async fn handle_search_people(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<ScoredPerson>>, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let people = state.search.search_employees(&query).await?;
    if people.is_empty() {
        return Err(AppError::NotFound("No results found".to_string()));
    }

    Ok(Json(people.into_iter().map(ScoredPerson::from).collect()))
}

/// POST /api/person/find
///
/// Federated search for employees matching a persona's skills.
pub async fn handle_find_person(
    State(state): State<AppState>,
    Json(request): Json<FindPersonRequest>,
) -> Result<Json<FindPersonResponse>, AppError> {
    let terms: Vec<String> = request
        .persona
        .skills
        .into_iter()
        .map(|s| s.name)
        .filter(|name| !name.trim().is_empty())
        .collect();
    if terms.is_empty() {
        return Err(AppError::Validation(
            "persona must contain at least one named skill".to_string(),
        ));
    }

    let people = state.search.find_person(&terms).await?;
    if people.is_empty() {
        return Err(AppError::NotFound("No results found".to_string()));
    }

    let result: Vec<ScoredPerson> = people.into_iter().map(ScoredPerson::from).collect();
    Ok(Json(FindPersonResponse {
        count: result.len(),
        result,
    }))
}
