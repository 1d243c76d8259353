//! Persona generation — one schema-constrained model call per request.

use tracing::{info, warn};

use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, LlmError, ResponseFormat};
use crate::models::persona::Persona;
use crate::models::review::{HalfYearReview, MonthlyReview};
use crate::persona::prompts::{
    build_persona_prompt, persona_schema, persona_system, PERSONA_SCHEMA_DESCRIPTION,
    PERSONA_SCHEMA_NAME,
};

/// Pinned so the model returns its most likely completion.
pub const PERSONA_TEMPERATURE: f32 = 0.0;

pub fn build_persona_request(half: &HalfYearReview, monthly: &MonthlyReview) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system(persona_system()),
            ChatMessage::user(build_persona_prompt(half, monthly)),
        ],
        temperature: PERSONA_TEMPERATURE,
        response_format: Some(ResponseFormat::strict_schema(
            PERSONA_SCHEMA_NAME,
            PERSONA_SCHEMA_DESCRIPTION,
            persona_schema(),
        )),
    }
}

/// Generates a persona from two reviews.
///
/// No choices or empty content yields an empty persona, not an error.
/// Content that does not match the persona shape is a parse error.
pub async fn generate_persona(
    model: &dyn ChatModel,
    half: &HalfYearReview,
    monthly: &MonthlyReview,
) -> Result<Persona, LlmError> {
    let request = build_persona_request(half, monthly);
    let response = model.complete(&request).await?;

    match response.json::<Persona>()? {
        Some(persona) if persona.is_empty() => {
            warn!("Model returned a persona with no skills and no career");
            Ok(persona)
        }
        Some(persona) => {
            info!(
                "Generated persona: {} skills, {} career entries",
                persona.skills.len(),
                persona.career.len()
            );
            Ok(persona)
        }
        None => {
            warn!("Model returned no content for persona");
            Ok(Persona::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{response_with, CannedModel};
    use crate::llm_client::{ChatResponse, ResponseFormat};
    use crate::models::persona::RoleCategory;

    const PERSONA_JSON: &str = r#"{
        "skills": [{"name": "Rust", "experience": 3, "description": "Builds backend services"}],
        "career": [{
            "start_month": "2021-04",
            "end_month": null,
            "company": "Acme",
            "position": "Backend Engineer",
            "role": "Engineer",
            "description": null
        }]
    }"#;

    #[tokio::test]
    async fn test_empty_reviews_and_empty_content_yield_empty_persona() {
        let model = CannedModel::replying("");
        let persona = generate_persona(&model, &HalfYearReview::default(), &MonthlyReview::default())
            .await
            .unwrap();

        assert_eq!(persona, Persona::default());
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_no_choices_yield_empty_persona() {
        let model = CannedModel::new(|| Ok(ChatResponse::default()));
        let persona = generate_persona(&model, &HalfYearReview::default(), &MonthlyReview::default())
            .await
            .unwrap();
        assert!(persona.is_empty());
    }

    #[tokio::test]
    async fn test_parses_persona() {
        let model = CannedModel::replying(PERSONA_JSON);
        let persona = generate_persona(&model, &HalfYearReview::default(), &MonthlyReview::default())
            .await
            .unwrap();

        assert_eq!(persona.skills[0].name, "Rust");
        assert_eq!(persona.skills[0].experience, 3);
        assert_eq!(persona.career[0].role, RoleCategory::Engineer);
        assert_eq!(persona.career[0].end_month, None);
    }

    #[tokio::test]
    async fn test_fenced_content_is_accepted() {
        let model = CannedModel::new(|| {
            Ok(response_with(Some("```json\n{\"skills\": [], \"career\": []}\n```")))
        });
        let persona = generate_persona(&model, &HalfYearReview::default(), &MonthlyReview::default())
            .await
            .unwrap();
        assert!(persona.is_empty());
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_parse_error() {
        let model = CannedModel::replying(r#"{"skills": [{"name": "Rust"}], "career": []}"#);
        let result =
            generate_persona(&model, &HalfYearReview::default(), &MonthlyReview::default()).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unknown_role_is_parse_error() {
        let model = CannedModel::replying(
            r#"{"skills": [], "career": [{"start_month": "2020-01", "end_month": null, "company": "Acme", "position": "CEO", "role": "Executive", "description": null}]}"#,
        );
        let result =
            generate_persona(&model, &HalfYearReview::default(), &MonthlyReview::default()).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_transport_error_surfaces() {
        let model = CannedModel::new(|| {
            Err(LlmError::Api {
                status: 401,
                message: "invalid api-key".into(),
            })
        });
        let result =
            generate_persona(&model, &HalfYearReview::default(), &MonthlyReview::default()).await;
        assert!(matches!(result, Err(LlmError::Api { status: 401, .. })));
    }

    #[test]
    fn test_request_is_deterministic_and_strict() {
        let half = HalfYearReview {
            short_term_1yr: "Ship the new search".into(),
            ..Default::default()
        };
        let request = build_persona_request(&half, &MonthlyReview::default());

        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("Ship the new search"));
        match request.response_format {
            Some(ResponseFormat::JsonSchema { json_schema }) => {
                assert!(json_schema.strict);
                assert_eq!(json_schema.name, "persona");
            }
            None => panic!("response format missing"),
        }
    }
}
