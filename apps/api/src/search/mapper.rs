//! Record mapping — turns the loosely typed field map of a search document
//! into `Person` / review records.
//!
//! Mapping never fails: absent keys leave optional fields unset and required
//! fields empty. Scalars that are not strings are rendered as strings.

use serde_json::{Map, Value};

use crate::models::person::Person;
use crate::models::review::{HalfYearReview, MonthlyReview};

pub type FieldMap = Map<String, Value>;

/// Reads `key` as a string. `None` for absent keys, `null` and nested objects.
pub fn optional_field(fields: &FieldMap, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// The record's `employee_id` when it is a string or a number.
pub fn employee_id_of(fields: &FieldMap) -> Option<String> {
    match fields.get("employee_id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`optional_field`] but falls back to an empty string.
pub fn required_field(fields: &FieldMap, key: &str) -> String {
    optional_field(fields, key).unwrap_or_default()
}

pub fn person_from_fields(fields: &FieldMap) -> Person {
    let get = |key: &str| optional_field(fields, key);
    Person {
        employee_id: required_field(fields, "employee_id"),
        employee_name: required_field(fields, "employee_name"),
        employee_name_kana: get("employee_name_kana"),
        nickname: get("nickname"),
        mail: get("mail"),
        age: get("age"),
        gender: get("gender"),
        birthday: get("birthday"),
        nationality: get("nationality"),
        location: get("location"),
        job_title: get("job_title"),
        job_family: get("job_family"),
        job_family_detail: get("job_family_detail"),
        dept_name: get("dept_name"),
        dept_1: get("dept_1"),
        dept_2: get("dept_2"),
        dept_3: get("dept_3"),
        dept_4: get("dept_4"),
        dept_5: get("dept_5"),
        dept_6: get("dept_6"),
        employment_type: get("employment_type"),
        employment_category: get("employment_category"),
        recruitment_category_new_graduate: get("recruitment_category_new_graduate"),
        current_employee_flag: get("current_employee_flag"),
        entered_at: get("entered_at"),
        retired_at: get("retired_at"),
        years_of_service: get("years_of_service"),
        salary_table: get("salary_table"),
        latest_job_grade: get("latest_job_grade"),
        latest_org_grade: get("latest_org_grade"),
        jp_non_jp_classification: get("jp_non_jp_classification"),
        load_date: get("load_date"),
    }
}

pub fn half_year_review_from_fields(fields: &FieldMap) -> HalfYearReview {
    HalfYearReview {
        employee_id: required_field(fields, "employee_id"),
        self_assessment_score: required_field(fields, "self_assessment_score"),
        half_year_self_review_achievement_growth: required_field(
            fields,
            "half_year_self_review_achievement_growth",
        ),
        short_term_1yr: required_field(fields, "short_term_1yr"),
        med_term_2_3yr: required_field(fields, "med_term_2_3yr"),
        fy_cycle: optional_field(fields, "fy_cycle"),
        cycle_start_date: optional_field(fields, "cycle_start_date"),
        dept_name: optional_field(fields, "dept_name"),
        upload_year_month: optional_field(fields, "upload_year_month"),
    }
}

pub fn monthly_review_from_fields(fields: &FieldMap) -> MonthlyReview {
    MonthlyReview {
        employee_id: required_field(fields, "employee_id"),
        monthly_goal: required_field(fields, "monthly_goal"),
        monthly_review: required_field(fields, "monthly_review"),
        fy_cycle: optional_field(fields, "fy_cycle"),
        year_month: optional_field(fields, "year_month"),
    }
}
