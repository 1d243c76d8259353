// Prompt templates and output schemas for target analysis and candidate evaluation.

use serde_json::{json, Value};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::person::Person;
use crate::similar::models::{Language, SoftCriteria};

pub const ANALYSIS_SCHEMA_NAME: &str = "similar_employee_analysis";
pub const ANALYSIS_SCHEMA_DESCRIPTION: &str =
    "Hard filters and soft criteria for finding employees similar to a target";

pub const EVALUATION_SCHEMA_NAME: &str = "candidate_evaluation";
pub const EVALUATION_SCHEMA_DESCRIPTION: &str =
    "Similarity of a candidate to a target employee on five dimensions";

const ANALYSIS_SYSTEM_EN: &str = "\
You are an experienced HR analyst. Analyse an employee profile and extract the \
criteria for finding similar employees.
- hard_filters are structural directory attributes that can be matched exactly: \
job_family, dept_3 (department names), job_title (titles), years_of_service_min \
(whole years) and current_employee_flag (\"●\" for current employees). \
Use null for any filter that should not apply.
- soft_criteria are skills and experience that are judged later from each candidate's profile.
- thinking_text explains in conversational English why these criteria were chosen.";

const ANALYSIS_SYSTEM_JA: &str = "\
あなたは優秀な人事アナリストです。従業員のプロファイルを分析し、類似した従業員を探すための検索条件を抽出します。
- hard_filtersは完全一致で絞り込める構造的な属性です: job_family、dept_3（部署名）、\
job_title（役職）、years_of_service_min（年数）、current_employee_flag（現在の従業員は\"●\"）。\
適用しない条件はnullにしてください。
- soft_criteriaはスキルや経験など、候補者ごとに後で評価する条件です。
- thinking_textは、なぜこれらの条件を選んだかを自然な日本語で会話的に説明してください。";

const EVALUATION_SYSTEM_EN: &str = "\
You are an experienced HR evaluator. Compare a candidate with a target employee \
and score their similarity on five dimensions.
- Every score is an integer from 0 to 100.
- overall is the rounded average of the five dimensions.
- At most 3 strengths and at most 2 gaps.
- explanation is one or two sentences of natural English.";

const EVALUATION_SYSTEM_JA: &str = "\
あなたは優秀な人事評価者です。候補者とターゲット従業員を比較し、類似度を5つの次元で評価してください。
- 各スコアは0から100の整数です。
- overallは5つの次元の平均（四捨五入）です。
- strengthsは最大3つ、gapsは最大2つです。
- explanationは自然な日本語で1〜2文です。";

pub fn analysis_system(language: Language) -> String {
    let base = match language {
        Language::En => ANALYSIS_SYSTEM_EN,
        Language::Ja => ANALYSIS_SYSTEM_JA,
    };
    format!("{base}\n{JSON_ONLY_SYSTEM}")
}

pub fn evaluation_system(language: Language) -> String {
    let base = match language {
        Language::En => EVALUATION_SYSTEM_EN,
        Language::Ja => EVALUATION_SYSTEM_JA,
    };
    format!("{base}\n{JSON_ONLY_SYSTEM}")
}

/// `profile` is the target employee rendered as pretty JSON.
pub fn build_analysis_prompt(profile: &str, language: Language) -> String {
    match language {
        Language::En => format!(
            "Analyse the following employee profile and extract search criteria to find similar employees:\n\n\
             {profile}\n\n\
             Available directory fields:\n\
             - employee_id, employee_name, mail\n\
             - job_title, job_family\n\
             - dept_1, dept_2, dept_3, dept_4, dept_5, dept_6\n\
             - years_of_service (text, e.g. \"1年3ヵ月\")\n\
             - current_employee_flag (\"●\" for current employees)\n\
             - location, employment_type, gender"
        ),
        Language::Ja => format!(
            "以下の従業員プロファイルを分析し、類似した従業員を探すための検索条件を抽出してください：\n\n\
             {profile}\n\n\
             利用可能なフィールド：\n\
             - employee_id, employee_name, mail\n\
             - job_title, job_family\n\
             - dept_1, dept_2, dept_3, dept_4, dept_5, dept_6\n\
             - years_of_service (文字列形式、例: \"1年3ヵ月\")\n\
             - current_employee_flag (\"●\" が現在の従業員)\n\
             - location, employment_type, gender"
        ),
    }
}

fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn describe(person: &Person, skills: &[String], language: Language) -> String {
    let (name, position, department, skill_label) = match language {
        Language::En => ("Name", "Position", "Department", "Skills"),
        Language::Ja => ("名前", "役職", "部署", "スキル"),
    };
    format!(
        "- {name}: {}\n- {position}: {}\n- {department}: {} / {}\n- {skill_label}: {}",
        person.employee_name,
        or_blank(&person.job_title),
        or_blank(&person.dept_3),
        or_blank(&person.dept_4),
        skills.join(", "),
    )
}

/// User message comparing one candidate with the target. Skill lists come from
/// stored personas and may be empty.
pub fn build_evaluation_prompt(
    target: &Person,
    target_skills: &[String],
    candidate: &Person,
    candidate_skills: &[String],
    criteria: &SoftCriteria,
    language: Language,
) -> String {
    let target_info = describe(target, target_skills, language);
    let candidate_info = describe(candidate, candidate_skills, language);
    let key_skills = criteria.key_skills.join(", ");
    let domains = criteria.domain_expertise.join(", ");
    let level = &criteria.experience_level;

    match language {
        Language::En => format!(
            "Target employee:\n{target_info}\n\n\
             Search criteria:\n\
             - Key skills: {key_skills}\n\
             - Domain expertise: {domains}\n\
             - Experience level: {level}\n\n\
             Candidate:\n{candidate_info}\n\n\
             Evaluate how similar this candidate is to the target employee across 5 dimensions."
        ),
        Language::Ja => format!(
            "ターゲット従業員:\n{target_info}\n\n\
             検索条件:\n\
             - 重要スキル: {key_skills}\n\
             - ドメイン専門性: {domains}\n\
             - 経験レベル: {level}\n\n\
             候補者:\n{candidate_info}\n\n\
             この候補者がターゲット従業員とどの程度類似しているか、5つの次元で評価してください。"
        ),
    }
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn nullable_string_list() -> Value {
    json!({ "type": ["array", "null"], "items": { "type": "string" } })
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "hard_filters": {
                "type": "object",
                "properties": {
                    "job_family": { "type": ["string", "null"] },
                    "dept_3": nullable_string_list(),
                    "job_title": nullable_string_list(),
                    "years_of_service_min": { "type": ["integer", "null"] },
                    "current_employee_flag": { "type": ["string", "null"] }
                },
                "required": ["job_family", "dept_3", "job_title", "years_of_service_min", "current_employee_flag"],
                "additionalProperties": false
            },
            "soft_criteria": {
                "type": "object",
                "properties": {
                    "key_skills": string_list(),
                    "domain_expertise": string_list(),
                    "experience_level": { "type": "string" },
                    "role_alignment": { "type": "string" },
                    "preferred_departments": string_list()
                },
                "required": ["key_skills", "domain_expertise", "experience_level", "role_alignment", "preferred_departments"],
                "additionalProperties": false
            },
            "thinking_text": { "type": "string" }
        },
        "required": ["hard_filters", "soft_criteria", "thinking_text"],
        "additionalProperties": false
    })
}

pub fn evaluation_schema() -> Value {
    let dimensions = [
        "technical_skills",
        "domain_expertise",
        "experience_level",
        "role_alignment",
        "soft_skills",
        "overall",
    ];
    let score_properties: serde_json::Map<String, Value> = dimensions
        .iter()
        .map(|d| (d.to_string(), json!({ "type": "integer" })))
        .collect();

    json!({
        "type": "object",
        "properties": {
            "scores": {
                "type": "object",
                "properties": score_properties,
                "required": dimensions,
                "additionalProperties": false
            },
            "strengths": string_list(),
            "gaps": string_list(),
            "explanation": { "type": "string" }
        },
        "required": ["scores", "strengths", "gaps", "explanation"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, name: &str, title: &str) -> Person {
        Person {
            employee_id: id.into(),
            employee_name: name.into(),
            job_title: Some(title.into()),
            dept_3: Some("AI推進室".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_analysis_prompt_embeds_profile() {
        let prompt = build_analysis_prompt("{\"employee_id\": \"E1\"}", Language::En);
        assert!(prompt.contains("{\"employee_id\": \"E1\"}"));
        assert!(prompt.contains("current_employee_flag"));
        assert!(build_analysis_prompt("{}", Language::Ja).contains("利用可能なフィールド"));
    }

    #[test]
    fn test_evaluation_prompt_names_both_sides() {
        let criteria = SoftCriteria {
            key_skills: vec!["Python".into(), "Azure".into()],
            experience_level: "Senior".into(),
            ..Default::default()
        };
        let prompt = build_evaluation_prompt(
            &person("E1", "Yamada", "ML Engineer"),
            &["Python".to_string()],
            &person("E2", "Sato", "Data Scientist"),
            &[],
            &criteria,
            Language::En,
        );
        assert!(prompt.contains("- Name: Yamada"));
        assert!(prompt.contains("- Position: Data Scientist"));
        assert!(prompt.contains("- Department: AI推進室 / "));
        assert!(prompt.contains("- Key skills: Python, Azure"));
        assert!(prompt.contains("- Experience level: Senior"));
    }

    #[test]
    fn test_schemas_require_every_property() {
        let analysis = analysis_schema();
        assert_eq!(
            analysis["properties"]["hard_filters"]["required"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
        let evaluation = evaluation_schema();
        assert_eq!(
            evaluation["properties"]["scores"]["required"],
            json!(["technical_skills", "domain_expertise", "experience_level", "role_alignment", "soft_skills", "overall"])
        );
        assert_eq!(
            evaluation["properties"]["scores"]["properties"]["overall"]["type"],
            "integer"
        );
    }

    #[test]
    fn test_system_prompts_follow_language() {
        assert!(analysis_system(Language::En).contains("HR analyst"));
        assert!(analysis_system(Language::Ja).contains("人事アナリスト"));
        assert!(evaluation_system(Language::Ja).contains("valid JSON only"));
    }
}
