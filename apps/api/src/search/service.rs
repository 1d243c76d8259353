//! Search orchestration: federated person search, scoped employee search and
//! review lookups.
//!
//! Flow of `find_person`:
//!   federated query → route each hit by collection →
//!     employee hit  → Person (direct match)
//!     review hit    → employee id into the identifier set
//!   → batch-resolve the identifier set against the employee directory
//!   → direct matches followed by resolved matches.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::models::person::Person;
use crate::models::review::{HalfYearReview, MonthlyReview};
use crate::search::collection::{CollectionCatalog, CollectionTag};
use crate::search::dedup::IdentifierSet;
use crate::search::mapper::{
    employee_id_of, half_year_review_from_fields, monthly_review_from_fields,
    person_from_fields, FieldMap,
};
use crate::search::stream::HitStream;
use crate::search::{
    ScopeLimits, SearchBackend, SearchError, SearchRequest, EMPLOYEE_SEARCH_LIMITS,
    FEDERATED_LIMITS, RESOLUTION_LIMITS, REVIEW_LOOKUP_LIMITS,
};

#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
    catalog: CollectionCatalog,
    timeout: Duration,
}

impl SearchService {
    pub fn new(backend: Arc<dyn SearchBackend>, catalog: CollectionCatalog, timeout: Duration) -> Self {
        Self {
            backend,
            catalog,
            timeout,
        }
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.timeout
    }

    fn stream(
        &self,
        scope: CollectionTag,
        query: String,
        filter: Option<String>,
        limits: ScopeLimits,
        deadline: Instant,
    ) -> HitStream<'_> {
        let request = SearchRequest {
            scope,
            query,
            filter,
            page_size: limits.page_size,
            page_token: None,
        };
        HitStream::new(self.backend.as_ref(), request, limits, deadline)
    }

    /// Finds employees matching `terms` across every collection.
    ///
    /// Review hits contribute their employee id, which is resolved once through
    /// the employee directory. A failed resolution is logged and the direct
    /// matches are still returned.
    pub async fn find_person(&self, terms: &[String]) -> Result<Vec<Person>, SearchError> {
        let query = build_query(terms);
        let deadline = self.deadline();
        info!("Federated person search: '{query}'");

        let mut people = Vec::new();
        let mut direct_ids = IdentifierSet::new();
        let mut indirect_ids = IdentifierSet::new();

        let mut stream = self.stream(CollectionTag::All, query, None, FEDERATED_LIMITS, deadline);
        while let Some(hit) = stream.next_hit().await? {
            let routed = match self.catalog.route(hit) {
                Ok(routed) => routed,
                Err(e) => {
                    warn!("Skipping unclassifiable hit: {e}");
                    continue;
                }
            };

            match routed.tag {
                CollectionTag::EmployeeDirectory => {
                    let person = person_from_fields(&routed.hit.fields);
                    direct_ids.add(&person.employee_id);
                    people.push(person);
                }
                CollectionTag::HalfYearReview => {
                    let review = half_year_review_from_fields(&routed.hit.fields);
                    indirect_ids.add(&review.employee_id);
                }
                CollectionTag::MonthlyReview => {
                    let review = monthly_review_from_fields(&routed.hit.fields);
                    indirect_ids.add(&review.employee_id);
                }
                other => debug!("Skipping {} hit {}", other.as_str(), routed.hit.id),
            }
        }
        debug!("Federated search read {} pages", stream.pages_fetched());

        let mut pending = IdentifierSet::new();
        for id in indirect_ids.iter().filter(|id| !direct_ids.contains(id)) {
            pending.add(id);
        }

        info!(
            "Federated search: {} direct matches, {} employees to resolve from reviews",
            people.len(),
            pending.len()
        );

        if !pending.is_empty() {
            match self.resolve_employees(&pending, deadline).await {
                Ok(resolved) => people.extend(resolved),
                Err(e) => warn!("Failed to resolve {} review-derived employees: {e}", pending.len()),
            }
        }

        Ok(people)
    }

    /// Looks up every id in `ids` in the employee directory with one filtered query.
    /// Results follow the order of `ids`; each id yields at most one person.
    async fn resolve_employees(
        &self,
        ids: &IdentifierSet,
        deadline: Instant,
    ) -> Result<Vec<Person>, SearchError> {
        let query = ids.iter().collect::<Vec<_>>().join(" ");
        let filter = any_of_filter("employee_id", ids.iter());
        let mut stream = self.stream(
            CollectionTag::EmployeeDirectory,
            query,
            Some(filter),
            RESOLUTION_LIMITS,
            deadline,
        );

        let mut resolved: Vec<Option<Person>> = vec![None; ids.len()];
        while let Some(hit) = stream.next_hit().await? {
            let person = person_from_fields(&hit.fields);
            match ids.position(&person.employee_id) {
                Some(i) if resolved[i].is_none() => resolved[i] = Some(person),
                Some(_) => {}
                None => debug!("Ignoring unrequested employee {}", person.employee_id),
            }
        }

        let missing = resolved.iter().filter(|p| p.is_none()).count();
        if missing > 0 {
            debug!("{missing} of {} employees not found in directory", ids.len());
        }

        Ok(resolved.into_iter().flatten().collect())
    }

    /// Free-text search restricted to the employee directory.
    pub async fn search_employees(&self, query: &str) -> Result<Vec<Person>, SearchError> {
        let mut stream = self.stream(
            CollectionTag::EmployeeDirectory,
            query.trim().to_string(),
            None,
            EMPLOYEE_SEARCH_LIMITS,
            self.deadline(),
        );

        let mut people = Vec::new();
        while let Some(hit) = stream.next_hit().await? {
            people.push(person_from_fields(&hit.fields));
        }
        Ok(people)
    }

    /// First half-year review whose `employee_id` equals `employee_id`, or an empty record.
    pub async fn get_half_year_review(&self, employee_id: &str) -> Result<HalfYearReview, SearchError> {
        let review = self
            .lookup_first(CollectionTag::HalfYearReview, employee_id, half_year_review_from_fields)
            .await?;
        Ok(review.unwrap_or_default())
    }

    /// First monthly review whose `employee_id` equals `employee_id`, or an empty record.
    pub async fn get_monthly_review(&self, employee_id: &str) -> Result<MonthlyReview, SearchError> {
        let review = self
            .lookup_first(CollectionTag::MonthlyReview, employee_id, monthly_review_from_fields)
            .await?;
        Ok(review.unwrap_or_default())
    }

    async fn lookup_first<T>(
        &self,
        scope: CollectionTag,
        employee_id: &str,
        map: fn(&FieldMap) -> T,
    ) -> Result<Option<T>, SearchError> {
        let mut stream = self.stream(
            scope,
            employee_id.to_string(),
            Some(any_of_filter("employee_id", [employee_id])),
            REVIEW_LOOKUP_LIMITS,
            self.deadline(),
        );

        while let Some(hit) = stream.next_hit().await? {
            let hit_id = employee_id_of(&hit.fields);
            if hit_id.as_deref() == Some(employee_id) {
                return Ok(Some(map(&hit.fields)));
            }
            debug!(
                "Skipping {} hit {} for employee {:?}",
                scope.as_str(),
                hit.id,
                hit_id
            );
        }

        debug!("No {} found for employee {employee_id}", scope.as_str());
        Ok(None)
    }
}

/// Joins non-blank query terms with spaces.
pub fn build_query(terms: &[String]) -> String {
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `field: ANY("a", "b")` with quotes and backslashes escaped.
pub fn any_of_filter<'a>(field: &str, values: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = values
        .into_iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("{field}: ANY({})", quoted.join(", "))
}
