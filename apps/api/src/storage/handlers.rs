//! Axum route handlers for employee documents.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// GET /api/face/:employee_id
pub async fn handle_face_image(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let image = state
        .documents
        .face_image(&employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No face image for {employee_id}")))?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], image))
}

/// GET /api/cv/:employee_id/exists
pub async fn handle_cv_exists(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<ExistsResponse>, AppError> {
    let exists = state.documents.cv_exists(&employee_id).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// GET /api/resume/:employee_id/exists
pub async fn handle_resume_exists(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<ExistsResponse>, AppError> {
    let exists = state.documents.resume_exists(&employee_id).await?;
    Ok(Json(ExistsResponse { exists }))
}
