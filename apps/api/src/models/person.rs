use serde::{Deserialize, Serialize};

/// A canonical employee record from the employee directory.
///
/// Only `employee_id` and `employee_name` are always present; every other
/// attribute is whatever the directory had for this employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name_kana: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_family_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruitment_category_new_graduate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_employee_flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retired_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_job_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_org_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jp_non_jp_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_date: Option<String>,
}

/// A person together with the relevance score reported back to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPerson {
    pub person: Person,
    pub score: f32,
}

impl From<Person> for ScoredPerson {
    fn from(person: Person) -> Self {
        // The search service does not expose a usable relevance value.
        Self { person, score: 1.0 }
    }
}
