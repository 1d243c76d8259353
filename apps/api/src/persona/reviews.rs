//! Review loading for persona generation: search first, archive dump as fallback.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::review::{HalfYearReview, MonthlyReview};
use crate::search::service::SearchService;
use crate::storage::archive::ReviewArchive;

#[derive(Debug, Clone, Default)]
pub struct EmployeeReviews {
    pub half_year: HalfYearReview,
    pub monthly: MonthlyReview,
}

/// JSON view where a missing review is `null`.
#[derive(Debug, Serialize)]
pub struct EmployeeReviewsResponse {
    pub half_year: Option<HalfYearReview>,
    pub monthly: Option<MonthlyReview>,
}

impl From<EmployeeReviews> for EmployeeReviewsResponse {
    fn from(reviews: EmployeeReviews) -> Self {
        Self {
            half_year: (!reviews.half_year.is_empty()).then_some(reviews.half_year),
            monthly: (!reviews.monthly.is_empty()).then_some(reviews.monthly),
        }
    }
}

/// Loads both reviews for `employee_id`. Each review comes from the search
/// service, or from the archive dump when search has none. Errors from either
/// source are surfaced.
pub async fn load_reviews(
    search: &SearchService,
    archive: &ReviewArchive,
    employee_id: &str,
) -> Result<EmployeeReviews, AppError> {
    let mut half_year = search.get_half_year_review(employee_id).await?;
    if half_year.is_empty() {
        info!("No half-year review indexed for {employee_id}, reading archive");
        half_year = archive.half_year_review(employee_id).await?;
    }

    let mut monthly = search.get_monthly_review(employee_id).await?;
    if monthly.is_empty() {
        info!("No monthly review indexed for {employee_id}, reading archive");
        monthly = archive.monthly_review(employee_id).await?;
    }

    Ok(EmployeeReviews { half_year, monthly })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::search::collection::{CollectionCatalog, CollectionTag};
    use crate::search::testing::{hit, page, ScriptedBackend};
    use crate::search::{SearchError, SearchPage};
    use crate::storage::archive::ArchiveKeys;
    use crate::storage::testing::MemoryStore;

    fn search(backend: ScriptedBackend) -> SearchService {
        SearchService::new(
            Arc::new(backend),
            CollectionCatalog::default(),
            Duration::from_secs(30),
        )
    }

    fn archive(store: MemoryStore) -> ReviewArchive {
        ReviewArchive::new(Arc::new(store), ArchiveKeys::default())
    }

    #[tokio::test]
    async fn test_search_first_archive_fallback() {
        let backend = ScriptedBackend::new(|req| match req.scope {
            CollectionTag::HalfYearReview => Ok(page(vec![hit(
                "half_year_review",
                "h-1",
                json!({ "employee_id": "E1", "short_term_1yr": "from search" }),
            )])),
            _ => Ok(SearchPage::default()),
        });
        let store = MemoryStore::default()
            .with(
                "reviews/half_year_review.jsonl",
                r#"{"employee_id":"E1","short_term_1yr":"from archive"}"#,
            )
            .with(
                "reviews/monthly_review.jsonl",
                r#"{"employee_id":"E1","monthly_goal":"archived goal"}"#,
            );

        let reviews = load_reviews(&search(backend), &archive(store), "E1")
            .await
            .unwrap();

        assert_eq!(reviews.half_year.short_term_1yr, "from search");
        assert_eq!(reviews.monthly.monthly_goal, "archived goal");
    }

    #[tokio::test]
    async fn test_search_error_is_not_masked_by_archive() {
        let backend = ScriptedBackend::new(|_| {
            Err(SearchError::Configuration("SEARCH_PROJECT_ID is not set".into()))
        });
        let result = load_reviews(&search(backend), &archive(MemoryStore::default()), "E1").await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_empty_reviews_serialize_as_null() {
        let response = EmployeeReviewsResponse::from(EmployeeReviews::default());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "half_year": null, "monthly": null }));
    }
}
