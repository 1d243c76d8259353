//! Axum route handlers for the similar-employee search stages.

use axum::{extract::State, Json};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::similar::analysis::analyze_target;
use crate::similar::evaluation::{evaluate_candidates, EvaluationInput};
use crate::similar::filter::{filter_candidates, filter_stats, filter_thinking_text};
use crate::similar::models::{
    EvaluateRequest, EvaluateResponse, FilterRequest, FilterResponse, SimilarSearchRequest,
    SimilarSearchResponse,
};
use crate::state::AppState;

fn require_id(id: &str, field: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// POST /api/search/similar-employees
///
/// Starts a search: the model derives hard filters and soft criteria from the target.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<SimilarSearchRequest>,
) -> Result<Json<SimilarSearchResponse>, AppError> {
    require_id(&req.target_employee.employee_id, "target_employee.employee_id")?;

    let search_id = Uuid::new_v4().to_string();
    info!(
        "Similar search {search_id}: analysing {}",
        req.target_employee.employee_id
    );

    let analysis = analyze_target(state.llm.as_ref(), &req.target_employee, req.language)
        .await
        .map_err(|e| AppError::Llm(format!("Target analysis failed: {e}")))?;

    Ok(Json(SimilarSearchResponse {
        search_id,
        stage: "analysis",
        thinking_text: analysis.thinking_text.clone(),
        analysis_result: analysis,
    }))
}

/// POST /api/search/filter
pub async fn handle_filter(
    State(state): State<AppState>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<FilterResponse>, AppError> {
    let employees = state.roster.employees().await?;
    if employees.is_empty() {
        return Err(AppError::NotFound("No employee data available".to_string()));
    }

    let today = chrono::Local::now().date_naive();
    let user_filters = req.user_filters.unwrap_or_default();
    let candidates = filter_candidates(
        &employees,
        &req.hard_filters,
        &user_filters,
        req.target_employee_id.trim(),
        today,
    );

    let stats = filter_stats(employees.len(), candidates.len());
    info!(
        "Similar search {}: {} of {} employees kept",
        req.search_id, stats.filtered_count, stats.total_employees
    );

    Ok(Json(FilterResponse {
        stage: "filtering",
        thinking_text: filter_thinking_text(&stats, req.language),
        candidate_ids: candidates.iter().map(|p| p.employee_id.clone()).collect(),
        stats,
    }))
}

/// POST /api/search/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    require_id(&req.target_employee.employee_id, "target_employee.employee_id")?;

    let roster = state.roster.employees().await?;
    let persona_skills = state.roster.persona_skills().await?;

    info!(
        "Similar search {}: evaluating {} candidates",
        req.search_id,
        req.candidate_ids.len()
    );

    let outcome = evaluate_candidates(
        state.llm.as_ref(),
        EvaluationInput {
            target: &req.target_employee,
            candidate_ids: &req.candidate_ids,
            roster: &roster,
            persona_skills: &persona_skills,
            criteria: &req.soft_criteria,
            language: req.language,
        },
    )
    .await;

    Ok(Json(EvaluateResponse {
        stage: "evaluation",
        thinking_text: outcome.thinking_text,
        progress_messages: outcome.progress_messages,
        top_3_candidates: outcome.top_candidates,
    }))
}
