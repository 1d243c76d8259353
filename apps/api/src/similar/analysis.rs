//! Target analysis: one schema-constrained model call that turns a target
//! employee into hard filters and soft criteria.

use tracing::{info, warn};

use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, LlmError, ResponseFormat};
use crate::models::person::Person;
use crate::similar::models::{Analysis, Language};
use crate::similar::prompts::{
    analysis_schema, analysis_system, build_analysis_prompt, ANALYSIS_SCHEMA_DESCRIPTION,
    ANALYSIS_SCHEMA_NAME,
};

pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

pub fn build_analysis_request(target: &Person, language: Language) -> Result<ChatRequest, LlmError> {
    let profile = serde_json::to_string_pretty(target)?;
    Ok(ChatRequest {
        messages: vec![
            ChatMessage::system(analysis_system(language)),
            ChatMessage::user(build_analysis_prompt(&profile, language)),
        ],
        temperature: ANALYSIS_TEMPERATURE,
        response_format: Some(ResponseFormat::strict_schema(
            ANALYSIS_SCHEMA_NAME,
            ANALYSIS_SCHEMA_DESCRIPTION,
            analysis_schema(),
        )),
    })
}

/// Asks the model for search criteria. Unlike persona generation, an empty
/// reply is an error because the later stages cannot run without criteria.
pub async fn analyze_target(
    model: &dyn ChatModel,
    target: &Person,
    language: Language,
) -> Result<Analysis, LlmError> {
    let request = build_analysis_request(target, language)?;
    let response = model.complete(&request).await?;

    let Some(mut analysis) = response.json::<Analysis>()? else {
        warn!("Model returned no content for analysis of {}", target.employee_id);
        return Err(LlmError::Empty);
    };

    if analysis.thinking_text.trim().is_empty() {
        analysis.thinking_text = match language {
            Language::Ja => "分析が完了しました。".into(),
            Language::En => "Analysis complete.".into(),
        };
    }

    info!(
        "Analysed {}: {} key skills, job_family filter {:?}",
        target.employee_id,
        analysis.soft_criteria.key_skills.len(),
        analysis.hard_filters.job_family
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::CannedModel;
    use crate::similar::models::HardFilters;

    const ANALYSIS_JSON: &str = r#"{
        "hard_filters": {
            "job_family": "Engineering",
            "dept_3": ["AI推進室"],
            "job_title": null,
            "years_of_service_min": 3,
            "current_employee_flag": "●"
        },
        "soft_criteria": {
            "key_skills": ["Python", "MLOps"],
            "domain_expertise": ["Retail"],
            "experience_level": "Senior",
            "role_alignment": "Hands-on engineer",
            "preferred_departments": []
        },
        "thinking_text": "Looking for senior ML engineers."
    }"#;

    fn target() -> Person {
        Person {
            employee_id: "E100".into(),
            employee_name: "Yamada Taro".into(),
            job_title: Some("ML Engineer".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_parses_hard_and_soft_criteria() {
        let model = CannedModel::replying(ANALYSIS_JSON);
        let analysis = analyze_target(&model, &target(), Language::En).await.unwrap();

        assert_eq!(analysis.hard_filters.job_family.as_deref(), Some("Engineering"));
        assert_eq!(analysis.hard_filters.dept_3, Some(vec!["AI推進室".to_string()]));
        assert_eq!(analysis.hard_filters.job_title, None);
        assert_eq!(analysis.hard_filters.years_of_service_min, Some(3));
        assert_eq!(analysis.soft_criteria.key_skills, vec!["Python", "MLOps"]);
        assert_eq!(analysis.thinking_text, "Looking for senior ML engineers.");
    }

    #[tokio::test]
    async fn test_request_carries_target_profile() {
        let model = CannedModel::replying(ANALYSIS_JSON);
        analyze_target(&model, &target(), Language::Ja).await.unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, ANALYSIS_TEMPERATURE);
        assert!(requests[0].messages[0].content.contains("人事アナリスト"));
        assert!(requests[0].messages[1].content.contains("\"employee_id\": \"E100\""));
        match &requests[0].response_format {
            Some(ResponseFormat::JsonSchema { json_schema }) => {
                assert!(json_schema.strict);
                assert_eq!(json_schema.name, ANALYSIS_SCHEMA_NAME);
            }
            None => panic!("response format missing"),
        }
    }

    #[tokio::test]
    async fn test_blank_thinking_text_gets_default() {
        let model = CannedModel::replying(
            r#"{"hard_filters": {}, "soft_criteria": {}, "thinking_text": "  "}"#,
        );
        let analysis = analyze_target(&model, &target(), Language::Ja).await.unwrap();
        assert_eq!(analysis.thinking_text, "分析が完了しました。");
        assert_eq!(analysis.hard_filters, HardFilters::default());
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let model = CannedModel::replying("");
        let result = analyze_target(&model, &target(), Language::En).await;
        assert!(matches!(result, Err(LlmError::Empty)));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_parse_error() {
        let model = CannedModel::replying(r#"{"hard_filters": "none"}"#);
        let result = analyze_target(&model, &target(), Language::En).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
