// Employee search over the document search service.
// Collections are routed by resource path; review hits are resolved back to
// employee records through the employee directory.

pub mod client;
pub mod collection;
pub mod dedup;
pub mod handlers;
pub mod mapper;
pub mod service;
pub mod stream;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use thiserror::Error;

use crate::search::collection::CollectionTag;
use crate::search::mapper::FieldMap;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search is not configured: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Search deadline exceeded")]
    DeadlineExceeded,
}

/// A single raw document returned by the search service.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    /// Full resource name of the document, used to find its collection.
    pub resource_path: String,
    pub fields: FieldMap,
}

/// One page of results. `next_page_token == None` means the service has no more.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub scope: CollectionTag,
    pub query: String,
    pub filter: Option<String>,
    pub page_size: u32,
    pub page_token: Option<String>,
}

/// Page size and page cap for one kind of search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeLimits {
    pub page_size: u32,
    pub max_pages: u32,
}

/// Federated "find person" search across every collection.
pub const FEDERATED_LIMITS: ScopeLimits = ScopeLimits {
    page_size: 10,
    max_pages: 5,
};

/// Free-text search scoped to the employee directory.
pub const EMPLOYEE_SEARCH_LIMITS: ScopeLimits = ScopeLimits {
    page_size: 10,
    max_pages: 1,
};

/// Review lookup by employee id.
pub const REVIEW_LOOKUP_LIMITS: ScopeLimits = ScopeLimits {
    page_size: 10,
    max_pages: 1,
};

/// Batch resolution of review-derived employee ids.
pub const RESOLUTION_LIMITS: ScopeLimits = ScopeLimits {
    page_size: 50,
    max_pages: 2,
};

/// The search service as seen by this crate: fetch one page for a request.
///
/// Carried in `SearchService` as `Arc<dyn SearchBackend>`.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, SearchError>;
}
