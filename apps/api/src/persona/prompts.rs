// Persona generation prompt templates and output schema.

use serde_json::{json, Value};

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::models::persona::RoleCategory;
use crate::models::review::{HalfYearReview, MonthlyReview};

pub const PERSONA_SCHEMA_NAME: &str = "persona";
pub const PERSONA_SCHEMA_DESCRIPTION: &str =
    "Skills and career history of an employee, derived from their reviews";

const PERSONA_SYSTEM_BASE: &str = "\
You are an HR evaluator. \
From an employee's past review texts, analyse their career history and skills \
and output them as JSON with this shape:
{
  \"skills\": [{\"name\": \"SkillName\", \"experience\": 2, \"description\": \"What they do with it\"}],
  \"career\": [{
    \"start_month\": \"YYYY-MM\",
    \"end_month\": \"YYYY-MM\" | null,
    \"company\": \"string\",
    \"position\": \"string\",
    \"role\": \"Business\" | \"Engineer\" | \"Manager\" | \"Other\",
    \"description\": \"string\" | null
  }]
}
`experience` is a whole number of years. \
Write descriptions in the language the reviews are written in.";

pub fn persona_system() -> String {
    format!("{PERSONA_SYSTEM_BASE}\n{GROUNDING_INSTRUCTION}\n{JSON_ONLY_SYSTEM}")
}

/// User message with the four review narratives interpolated verbatim.
pub fn build_persona_prompt(half: &HalfYearReview, monthly: &MonthlyReview) -> String {
    format!(
        "Analyse my career and skills from my past half-year and monthly reviews.\n\
         ## Half-year review\n\
         self_assessment_score:\n{}\n\
         half_year_self_review_achievement_growth:\n{}\n\
         short_term_1yr:\n{}\n\
         med_term_2_3yr:\n{}\n\
         ## Monthly review\n\
         monthly_goal:\n{}\n\
         monthly_review:\n{}",
        half.self_assessment_score,
        half.half_year_self_review_achievement_growth,
        half.short_term_1yr,
        half.med_term_2_3yr,
        monthly.monthly_goal,
        monthly.monthly_review,
    )
}

/// JSON schema for strict structured output. Every property is required;
/// optional values are nullable instead.
pub fn persona_schema() -> Value {
    let roles: Vec<&str> = RoleCategory::ALL.iter().map(RoleCategory::as_str).collect();
    json!({
        "type": "object",
        "properties": {
            "skills": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "experience": { "type": "integer" },
                        "description": { "type": "string" }
                    },
                    "required": ["name", "experience", "description"],
                    "additionalProperties": false
                }
            },
            "career": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "start_month": { "type": "string" },
                        "end_month": { "type": ["string", "null"] },
                        "company": { "type": "string" },
                        "position": { "type": "string" },
                        "role": { "type": "string", "enum": roles },
                        "description": { "type": ["string", "null"] }
                    },
                    "required": ["start_month", "end_month", "company", "position", "role", "description"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["skills", "career"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_interpolates_verbatim() {
        let half = HalfYearReview {
            employee_id: "E1".into(),
            self_assessment_score: "4".into(),
            half_year_self_review_achievement_growth: "Led {team} of 5".into(),
            short_term_1yr: "Become tech lead".into(),
            med_term_2_3yr: "Engineering manager".into(),
            ..Default::default()
        };
        let monthly = MonthlyReview {
            employee_id: "E1".into(),
            monthly_goal: "Finish migration".into(),
            monthly_review: "Done, 20% faster".into(),
            ..Default::default()
        };

        let prompt = build_persona_prompt(&half, &monthly);
        for text in [
            "Led {team} of 5",
            "Become tech lead",
            "Engineering manager",
            "Finish migration",
            "Done, 20% faster",
        ] {
            assert!(prompt.contains(text), "missing {text}");
        }
    }

    #[test]
    fn test_schema_enumerates_roles() {
        let schema = persona_schema();
        let roles = &schema["properties"]["career"]["items"]["properties"]["role"]["enum"];
        assert_eq!(roles, &json!(["Business", "Engineer", "Manager", "Other"]));
        assert_eq!(schema["required"], json!(["skills", "career"]));
    }

    #[test]
    fn test_system_prompt_demands_json_only() {
        let system = persona_system();
        assert!(system.contains("valid JSON only"));
        assert!(system.contains("\"role\""));
    }
}
