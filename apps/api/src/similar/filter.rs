//! Hard filtering: narrows the roster to candidates before any model call.
//!
//! Pure over its inputs. `today` is passed in so date arithmetic is
//! reproducible in tests.

use chrono::NaiveDate;

use crate::models::person::Person;
use crate::similar::models::{
    DateRange, ExperienceFilter, FilterStats, GenderFilter, HardFilters, Language, UserFilters,
};

pub const MAX_FILTERED_CANDIDATES: usize = 50;

const DEPARTMENT_KEYWORDS: &[&str] = &[
    "ai",
    "機械学習",
    "データ",
    "ml",
    "データサイエンス",
    "ai推進",
    "aiアクセラレーション",
];
const ENGINEER_KEYWORDS: &[&str] = &["エンジニア", "engineer"];
const DATA_AI_KEYWORDS: &[&str] = &[
    "データ",
    "data",
    "サイエンティスト",
    "scientist",
    "ai",
    "ml",
    "機械学習",
    "machine learning",
];

const DAYS_PER_YEAR: f64 = 365.25;

/// Employees other than the target that pass every filter, in roster order,
/// capped at `MAX_FILTERED_CANDIDATES`.
pub fn filter_candidates<'a>(
    employees: &'a [Person],
    hard: &HardFilters,
    user: &UserFilters,
    target_id: &str,
    today: NaiveDate,
) -> Vec<&'a Person> {
    employees
        .iter()
        .filter(|e| e.employee_id != target_id)
        .filter(|e| passes_hard_filters(e, hard))
        .filter(|e| passes_user_filters(e, user, today))
        .take(MAX_FILTERED_CANDIDATES)
        .collect()
}

pub fn filter_stats(total_employees: usize, filtered_count: usize) -> FilterStats {
    let elimination_rate = if total_employees == 0 {
        0.0
    } else {
        let rate = (total_employees - filtered_count) as f64 / total_employees as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    };
    FilterStats {
        total_employees,
        filtered_count,
        elimination_rate,
    }
}

pub fn filter_thinking_text(stats: &FilterStats, language: Language) -> String {
    match language {
        Language::En => format!(
            "Searched the employee directory. Found {} candidates from {} employees ({:.1}% eliminated).",
            stats.filtered_count, stats.total_employees, stats.elimination_rate
        ),
        Language::Ja => format!(
            "データベースを検索しました。{}人の従業員から{}人の候補者を見つけました（{:.1}%を除外）。",
            stats.total_employees, stats.filtered_count, stats.elimination_rate
        ),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn share_keyword(a: &str, b: &str, keywords: &[&str]) -> bool {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    keywords.iter().any(|k| a.contains(k) && b.contains(k))
}

fn passes_hard_filters(employee: &Person, hard: &HardFilters) -> bool {
    if let Some(flag) = non_empty(&hard.current_employee_flag) {
        if employee.current_employee_flag.as_deref() != Some(flag) {
            return false;
        }
    }

    let family_filter = non_empty(&hard.job_family);
    if let Some(family) = family_filter {
        if employee.job_family.as_deref() != Some(family) {
            return false;
        }
    }

    if let Some(depts) = hard.dept_3.as_ref().filter(|d| !d.is_empty()) {
        let dept = employee.dept_3.as_deref().unwrap_or("");
        let related = depts
            .iter()
            .any(|d| d == dept || share_keyword(dept, d, DEPARTMENT_KEYWORDS));
        if !related {
            return false;
        }
    }

    if let Some(titles) = hard.job_title.as_ref().filter(|t| !t.is_empty()) {
        let title = employee.job_title.as_deref().unwrap_or("");
        // A matching job family admits any title.
        let same_family = family_filter.is_some_and(|f| employee.job_family.as_deref() == Some(f));
        let similar = same_family
            || titles.iter().any(|t| {
                t == title
                    || share_keyword(title, t, ENGINEER_KEYWORDS)
                    || share_keyword(title, t, DATA_AI_KEYWORDS)
            });
        if !similar {
            return false;
        }
    }

    if let Some(min) = hard.years_of_service_min.filter(|m| *m > 0) {
        // Unparseable tenure is not held against the employee.
        if let Some(years) = employee.years_of_service.as_deref().and_then(parse_service_years) {
            if years < min {
                return false;
            }
        }
    }

    true
}

/// Whole years from tenure text such as "1年3ヵ月" or "4 years 2 months".
fn parse_service_years(text: &str) -> Option<u32> {
    let end = text.find('年').or_else(|| text.find(" year"))?;
    let digits: String = text[..end]
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

fn years_since(start: NaiveDate, today: NaiveDate) -> f64 {
    (today - start).num_days() as f64 / DAYS_PER_YEAR
}

fn passes_user_filters(employee: &Person, user: &UserFilters, today: NaiveDate) -> bool {
    if let Some(gender) = user.gender {
        if !matches_gender(employee, gender) {
            return false;
        }
    }

    if let Some(experience) = user.experience {
        let years = employee
            .entered_at
            .as_deref()
            .and_then(parse_date)
            .map(|d| years_since(d, today))
            .unwrap_or(0.0);
        if !matches_experience(years, experience) {
            return false;
        }
    }

    if let Some(range) = active(&user.join_date) {
        if !date_in_range(employee.entered_at.as_deref(), range) {
            return false;
        }
    }

    if let Some(range) = active(&user.birth_date) {
        if !date_in_range(employee.birthday.as_deref(), range) {
            return false;
        }
    }

    if let Some(range) = active(&user.employment_period) {
        if !employed_within(employee, range, today) {
            return false;
        }
    }

    if let Some(range) = active(&user.departure_date) {
        match employee.retired_at.as_deref().filter(|r| !r.is_empty()) {
            Some(retired) => {
                if !date_in_range(Some(retired), range) {
                    return false;
                }
            }
            None => {
                if bound(&range.from).is_some() || bound(&range.to).is_some() {
                    return false;
                }
            }
        }
    }

    true
}

fn active(range: &Option<DateRange>) -> Option<&DateRange> {
    range.as_ref().filter(|r| !r.no_input)
}

fn bound(value: &Option<String>) -> Option<NaiveDate> {
    value.as_deref().and_then(parse_date)
}

/// Unselected genders apply no restriction.
fn matches_gender(employee: &Person, filter: GenderFilter) -> bool {
    if !filter.male && !filter.female {
        return true;
    }
    match employee.gender.as_deref().map(str::trim) {
        Some("男") | Some("male") | Some("Male") => filter.male,
        Some("女") | Some("female") | Some("Female") => filter.female,
        _ => false,
    }
}

fn matches_experience(years: f64, filter: ExperienceFilter) -> bool {
    if !filter.less_than_3 && !filter.less_than_5 && !filter.more_than_5 {
        return true;
    }
    (filter.less_than_3 && years < 3.0)
        || (filter.less_than_5 && years < 5.0)
        || (filter.more_than_5 && years >= 5.0)
}

/// A missing or unparseable date passes; only a known date outside the range excludes.
fn date_in_range(value: Option<&str>, range: &DateRange) -> bool {
    let Some(date) = value.and_then(parse_date) else {
        return true;
    };
    if bound(&range.from).is_some_and(|from| date < from) {
        return false;
    }
    if bound(&range.to).is_some_and(|to| date > to) {
        return false;
    }
    true
}

/// Joined on or after `from` and left (or is still employed as of `today`) on or before `to`.
fn employed_within(employee: &Person, range: &DateRange, today: NaiveDate) -> bool {
    let Some(entered) = employee.entered_at.as_deref().and_then(parse_date) else {
        return true;
    };
    let left = employee
        .retired_at
        .as_deref()
        .and_then(parse_date)
        .unwrap_or(today);
    if bound(&range.from).is_some_and(|from| entered < from) {
        return false;
    }
    if bound(&range.to).is_some_and(|to| left > to) {
        return false;
    }
    true
}
