use serde::{Deserialize, Serialize};

use crate::models::person::Person;

/// Language of prompts and of the narrative text returned to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

/// Structural attributes every candidate must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardFilters {
    #[serde(default)]
    pub job_family: Option<String>,
    #[serde(default)]
    pub dept_3: Option<Vec<String>>,
    #[serde(default)]
    pub job_title: Option<Vec<String>>,
    #[serde(default)]
    pub years_of_service_min: Option<u32>,
    /// "●" marks current employees in the directory.
    #[serde(default)]
    pub current_employee_flag: Option<String>,
}

/// Skills and experience judged by the model during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftCriteria {
    pub key_skills: Vec<String>,
    pub domain_expertise: Vec<String>,
    pub experience_level: String,
    pub role_alignment: String,
    pub preferred_departments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub hard_filters: HardFilters,
    pub soft_criteria: SoftCriteria,
    #[serde(default)]
    pub thinking_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarSearchRequest {
    pub target_employee: Person,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct SimilarSearchResponse {
    pub search_id: String,
    pub stage: &'static str,
    pub thinking_text: String,
    pub analysis_result: Analysis,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenderFilter {
    pub male: bool,
    pub female: bool,
}

/// Years since joining. Selected buckets are alternatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExperienceFilter {
    #[serde(rename = "lessThan3")]
    pub less_than_3: bool,
    #[serde(rename = "lessThan5")]
    pub less_than_5: bool,
    #[serde(rename = "moreThan5")]
    pub more_than_5: bool,
}

/// Inclusive `YYYY-MM-DD` bounds. `no_input` disables the range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
    pub no_input: bool,
}

/// Filters picked by the user on top of the model's hard filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserFilters {
    pub gender: Option<GenderFilter>,
    pub experience: Option<ExperienceFilter>,
    pub join_date: Option<DateRange>,
    pub birth_date: Option<DateRange>,
    pub employment_period: Option<DateRange>,
    pub departure_date: Option<DateRange>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub search_id: String,
    #[serde(default)]
    pub hard_filters: HardFilters,
    pub target_employee_id: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub user_filters: Option<UserFilters>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterStats {
    pub total_employees: usize,
    pub filtered_count: usize,
    /// Percentage of the roster excluded, one decimal place.
    pub elimination_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub stage: &'static str,
    pub thinking_text: String,
    pub stats: FilterStats,
    pub candidate_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationScores {
    pub technical_skills: u32,
    pub domain_expertise: u32,
    pub experience_level: u32,
    pub role_alignment: u32,
    pub soft_skills: u32,
    pub overall: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    pub scores: EvaluationScores,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub search_id: String,
    pub target_employee: Person,
    pub candidate_ids: Vec<String>,
    #[serde(default)]
    pub soft_criteria: SoftCriteria,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub candidate: Person,
    pub evaluation: CandidateEvaluation,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub stage: &'static str,
    pub thinking_text: String,
    pub progress_messages: Vec<String>,
    pub top_3_candidates: Vec<RankedCandidate>,
}
