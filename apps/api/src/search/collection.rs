//! Collection routing — classifies a raw search hit by the document collection
//! it came from.
//!
//! Every document the search service returns carries a resource path such as
//! `projects/p/locations/global/collections/default_collection/dataStores/employee_info/branches/0/documents/42`.
//! The segment after `dataStores` names the data store, which the catalog maps
//! to a [`CollectionTag`].

use serde::Serialize;
use thiserror::Error;

use crate::search::SearchHit;

/// Resource path segment that precedes the collection (data store) name.
pub const COLLECTION_MARKER: &str = "dataStores";

/// The logical document collections known to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionTag {
    HalfYearReview,
    MonthlyReview,
    EmployeeDirectory,
    Resume,
    Cv,
    ResumeMetadata,
    CvMetadata,
    /// The federated engine spanning every collection above.
    All,
}

impl CollectionTag {
    /// Every tag backed by a single data store, i.e. everything except [`CollectionTag::All`].
    pub const STORES: [CollectionTag; 7] = [
        CollectionTag::HalfYearReview,
        CollectionTag::MonthlyReview,
        CollectionTag::EmployeeDirectory,
        CollectionTag::Resume,
        CollectionTag::Cv,
        CollectionTag::ResumeMetadata,
        CollectionTag::CvMetadata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionTag::HalfYearReview => "half_year_review",
            CollectionTag::MonthlyReview => "monthly_review",
            CollectionTag::EmployeeDirectory => "employee_info",
            CollectionTag::Resume => "resume",
            CollectionTag::Cv => "cv",
            CollectionTag::ResumeMetadata => "resume_metadata",
            CollectionTag::CvMetadata => "cv_metadata",
            CollectionTag::All => "all",
        }
    }

    /// Environment variable overriding the data store id of this collection.
    pub fn env_key(&self) -> &'static str {
        match self {
            CollectionTag::HalfYearReview => "SEARCH_DATA_STORE_HALF_YEAR_REVIEW",
            CollectionTag::MonthlyReview => "SEARCH_DATA_STORE_MONTHLY_REVIEW",
            CollectionTag::EmployeeDirectory => "SEARCH_DATA_STORE_EMPLOYEE",
            CollectionTag::Resume => "SEARCH_DATA_STORE_RESUME",
            CollectionTag::Cv => "SEARCH_DATA_STORE_CV",
            CollectionTag::ResumeMetadata => "SEARCH_DATA_STORE_RESUME_METADATA",
            CollectionTag::CvMetadata => "SEARCH_DATA_STORE_CV_METADATA",
            CollectionTag::All => "SEARCH_ENGINE_ID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("resource path has no collection marker segment: {0}")]
    MissingMarker(String),

    #[error("resource path has no collection name after the marker: {0}")]
    MissingCollection(String),

    #[error("unknown collection '{0}'")]
    UnknownCollection(String),
}

/// A hit together with the collection it was classified into. The hit is untouched.
#[derive(Debug, Clone)]
pub struct RoutedHit {
    pub tag: CollectionTag,
    pub hit: SearchHit,
}

/// Maps data store ids to collection tags and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCatalog {
    stores: Vec<(CollectionTag, String)>,
}

impl Default for CollectionCatalog {
    fn default() -> Self {
        Self {
            stores: CollectionTag::STORES
                .iter()
                .map(|tag| (*tag, tag.as_str().to_string()))
                .collect(),
        }
    }
}

impl CollectionCatalog {
    /// Replaces the data store id used for `tag`.
    pub fn with_store(mut self, tag: CollectionTag, store_id: impl Into<String>) -> Self {
        let store_id = store_id.into();
        match self.stores.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = store_id,
            None => self.stores.push((tag, store_id)),
        }
        self
    }

    pub fn store_id(&self, tag: CollectionTag) -> Option<&str> {
        self.stores
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, id)| id.as_str())
    }

    pub fn tag_for(&self, store_id: &str) -> Option<CollectionTag> {
        self.stores
            .iter()
            .find(|(_, id)| id == store_id)
            .map(|(tag, _)| *tag)
    }

    /// Extracts the collection name from a resource path and maps it to a tag.
    pub fn classify(&self, resource_path: &str) -> Result<CollectionTag, RouteError> {
        let mut segments = resource_path.split('/').filter(|s| !s.is_empty());

        if !segments.any(|s| s == COLLECTION_MARKER) {
            return Err(RouteError::MissingMarker(resource_path.to_string()));
        }

        let name = segments
            .next()
            .ok_or_else(|| RouteError::MissingCollection(resource_path.to_string()))?;

        self.tag_for(name)
            .ok_or_else(|| RouteError::UnknownCollection(name.to_string()))
    }

    pub fn route(&self, hit: SearchHit) -> Result<RoutedHit, RouteError> {
        let tag = self.classify(&hit.resource_path)?;
        Ok(RoutedHit { tag, hit })
    }
}
