pub mod health;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::persona::handlers as persona;
use crate::search::handlers as search;
use crate::similar::handlers as similar;
use crate::state::AppState;
use crate::storage::handlers as documents;

pub fn build_router(state: AppState) -> Router {
    let dist = Path::new(&state.config.frontend_dist);
    // Unknown paths fall through to the frontend bundle; client-side routes get index.html.
    let frontend = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Search
        .route("/api/people/:query", get(search::handle_search_people))
        .route("/api/person/find", post(search::handle_find_person))
        // Persona
        .route("/api/persona", post(persona::handle_generate_persona))
        .route("/api/reviews/:employee_id", get(persona::handle_get_reviews))
        // Similar-employee search
        .route("/api/search/similar-employees", post(similar::handle_analyze))
        .route("/api/search/filter", post(similar::handle_filter))
        .route("/api/search/evaluate", post(similar::handle_evaluate))
        // Employee documents
        .route("/api/face/:employee_id", get(documents::handle_face_image))
        .route("/api/cv/:employee_id/exists", get(documents::handle_cv_exists))
        .route(
            "/api/resume/:employee_id/exists",
            get(documents::handle_resume_exists),
        )
        .fallback_service(frontend)
        .with_state(state)
}
