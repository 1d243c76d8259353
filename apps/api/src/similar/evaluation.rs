//! Candidate evaluation: one model call per candidate, best three kept.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, LlmError, ResponseFormat};
use crate::models::person::Person;
use crate::similar::models::{CandidateEvaluation, Language, RankedCandidate, SoftCriteria};
use crate::similar::prompts::{
    build_evaluation_prompt, evaluation_schema, evaluation_system, EVALUATION_SCHEMA_DESCRIPTION,
    EVALUATION_SCHEMA_NAME,
};

pub const EVALUATION_TEMPERATURE: f32 = 0.2;
pub const MAX_EVALUATED_CANDIDATES: usize = 30;
pub const TOP_CANDIDATES: usize = 3;

const MAX_STRENGTHS: usize = 3;
const MAX_GAPS: usize = 2;
const MAX_SCORE: u32 = 100;

/// Everything the evaluation stage needs besides the model.
pub struct EvaluationInput<'a> {
    pub target: &'a Person,
    pub candidate_ids: &'a [String],
    pub roster: &'a [Person],
    /// Skill names from stored personas, keyed by employee id.
    pub persona_skills: &'a HashMap<String, Vec<String>>,
    pub criteria: &'a SoftCriteria,
    pub language: Language,
}

#[derive(Debug, Default)]
pub struct EvaluationOutcome {
    pub thinking_text: String,
    pub progress_messages: Vec<String>,
    pub top_candidates: Vec<RankedCandidate>,
}

/// Evaluates up to `MAX_EVALUATED_CANDIDATES` candidates in order.
///
/// Ids missing from the roster are skipped. A failed model call or an
/// unusable reply drops that candidate and the rest still run.
pub async fn evaluate_candidates(
    model: &dyn ChatModel,
    input: EvaluationInput<'_>,
) -> EvaluationOutcome {
    let ids = &input.candidate_ids[..input.candidate_ids.len().min(MAX_EVALUATED_CANDIDATES)];
    let empty = Vec::new();
    let target_skills = input
        .persona_skills
        .get(&input.target.employee_id)
        .unwrap_or(&empty);

    let mut progress_messages = Vec::new();
    let mut evaluated: Vec<(Person, CandidateEvaluation)> = Vec::new();

    for (idx, id) in ids.iter().enumerate() {
        let Some(candidate) = input.roster.iter().find(|p| &p.employee_id == id) else {
            warn!("Candidate {id} is not in the employee roster");
            continue;
        };

        progress_messages.push(progress_message(idx + 1, ids.len(), candidate, input.language));

        let candidate_skills = input.persona_skills.get(id).unwrap_or(&empty);
        let request = build_evaluation_request(
            input.target,
            target_skills,
            candidate,
            candidate_skills,
            input.criteria,
            input.language,
        );

        match evaluate_one(model, &request).await {
            Ok(evaluation) => evaluated.push((candidate.clone(), evaluation)),
            Err(e) => warn!("Skipping candidate {id}: {e}"),
        }
    }

    let evaluated_count = evaluated.len();
    // Stable, so equal scores keep candidate order.
    evaluated.sort_by(|a, b| b.1.scores.overall.cmp(&a.1.scores.overall));

    let top_candidates = evaluated
        .into_iter()
        .take(TOP_CANDIDATES)
        .enumerate()
        .map(|(i, (candidate, evaluation))| RankedCandidate {
            rank: i + 1,
            candidate,
            evaluation,
        })
        .collect();

    info!("Evaluated {evaluated_count} of {} candidates", ids.len());

    EvaluationOutcome {
        thinking_text: match input.language {
            Language::En => format!(
                "Candidate analysis complete. Evaluated {evaluated_count} candidates and selected the top 3 most similar employees."
            ),
            Language::Ja => format!(
                "候補者の分析が完了しました。{evaluated_count}人の候補者を評価し、最も類似した3人を選出しました。"
            ),
        },
        progress_messages,
        top_candidates,
    }
}

pub fn build_evaluation_request(
    target: &Person,
    target_skills: &[String],
    candidate: &Person,
    candidate_skills: &[String],
    criteria: &SoftCriteria,
    language: Language,
) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system(evaluation_system(language)),
            ChatMessage::user(build_evaluation_prompt(
                target,
                target_skills,
                candidate,
                candidate_skills,
                criteria,
                language,
            )),
        ],
        temperature: EVALUATION_TEMPERATURE,
        response_format: Some(ResponseFormat::strict_schema(
            EVALUATION_SCHEMA_NAME,
            EVALUATION_SCHEMA_DESCRIPTION,
            evaluation_schema(),
        )),
    }
}

async fn evaluate_one(
    model: &dyn ChatModel,
    request: &ChatRequest,
) -> Result<CandidateEvaluation, LlmError> {
    let response = model.complete(request).await?;
    let mut evaluation = response
        .json::<CandidateEvaluation>()?
        .ok_or(LlmError::Empty)?;

    evaluation.strengths.truncate(MAX_STRENGTHS);
    evaluation.gaps.truncate(MAX_GAPS);
    let scores = &mut evaluation.scores;
    for score in [
        &mut scores.technical_skills,
        &mut scores.domain_expertise,
        &mut scores.experience_level,
        &mut scores.role_alignment,
        &mut scores.soft_skills,
        &mut scores.overall,
    ] {
        *score = (*score).min(MAX_SCORE);
    }
    Ok(evaluation)
}

fn progress_message(current: usize, total: usize, candidate: &Person, language: Language) -> String {
    let name = if candidate.employee_name.is_empty() {
        &candidate.employee_id
    } else {
        &candidate.employee_name
    };
    match language {
        Language::En => format!("Analyzing candidate {current} of {total}: {name}"),
        Language::Ja => format!("候補者 {current}/{total} を分析中: {name}"),
    }
}
