use serde::{Deserialize, Serialize};

/// One half-year review cycle for an employee.
///
/// The narrative fields are kept as plain strings (empty when absent) because
/// they are interpolated verbatim into the persona prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfYearReview {
    pub employee_id: String,
    pub self_assessment_score: String,
    pub half_year_self_review_achievement_growth: String,
    pub short_term_1yr: String,
    pub med_term_2_3yr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_year_month: Option<String>,
}

impl HalfYearReview {
    /// An empty record stands for "no review found".
    pub fn is_empty(&self) -> bool {
        self.employee_id.is_empty()
    }
}

/// One monthly check-in for an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyReview {
    pub employee_id: String,
    pub monthly_goal: String,
    pub monthly_review: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_month: Option<String>,
}

impl MonthlyReview {
    pub fn is_empty(&self) -> bool {
        self.employee_id.is_empty()
    }
}
