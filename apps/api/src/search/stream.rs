//! Lazily paginated hit stream with a hard page cap and a deadline.

use std::collections::VecDeque;

use tokio::time::Instant;
use tracing::debug;

use crate::search::{ScopeLimits, SearchBackend, SearchError, SearchHit, SearchRequest};

/// Yields hits one at a time, fetching pages on demand.
///
/// `Ok(None)` marks the end of the stream: either the service ran out of pages
/// or `max_pages` pages have been fetched.
pub struct HitStream<'a> {
    backend: &'a dyn SearchBackend,
    request: SearchRequest,
    buffered: VecDeque<SearchHit>,
    pages_fetched: u32,
    max_pages: u32,
    finished: bool,
    deadline: Instant,
}

impl<'a> HitStream<'a> {
    pub fn new(
        backend: &'a dyn SearchBackend,
        request: SearchRequest,
        limits: ScopeLimits,
        deadline: Instant,
    ) -> Self {
        Self {
            backend,
            request: SearchRequest {
                page_size: limits.page_size,
                page_token: None,
                ..request
            },
            buffered: VecDeque::new(),
            pages_fetched: 0,
            max_pages: limits.max_pages,
            finished: false,
            deadline,
        }
    }

    pub async fn next_hit(&mut self) -> Result<Option<SearchHit>, SearchError> {
        loop {
            if let Some(hit) = self.buffered.pop_front() {
                return Ok(Some(hit));
            }
            if self.finished || self.pages_fetched >= self.max_pages {
                return Ok(None);
            }

            let page = tokio::time::timeout_at(
                self.deadline,
                self.backend.search_page(&self.request),
            )
            .await
            .map_err(|_| SearchError::DeadlineExceeded)??;
            self.pages_fetched += 1;

            debug!(
                "Fetched page {} of {:?} search: {} hits",
                self.pages_fetched,
                self.request.scope,
                page.hits.len()
            );

            match page.next_page_token {
                Some(token) => self.request.page_token = Some(token),
                None => self.finished = true,
            }
            self.buffered.extend(page.hits);
        }
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }
}
