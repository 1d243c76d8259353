//! Scripted in-memory search backend for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::search::collection::CollectionTag;
use crate::search::mapper::FieldMap;
use crate::search::{SearchBackend, SearchError, SearchHit, SearchPage, SearchRequest};

type Responder = dyn Fn(&SearchRequest) -> Result<SearchPage, SearchError> + Send + Sync;

/// Answers every request with a closure and records what it was asked.
pub struct ScriptedBackend {
    respond: Box<Responder>,
    requests: Mutex<Vec<SearchRequest>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new(
        respond: impl Fn(&SearchRequest) -> Result<SearchPage, SearchError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, scope: CollectionTag) -> Vec<SearchRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.scope == scope)
            .collect()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.respond)(request)
    }
}

pub fn hit(store: &str, doc_id: &str, fields: Value) -> SearchHit {
    let fields: FieldMap = match fields {
        Value::Object(map) => map,
        _ => FieldMap::new(),
    };
    SearchHit {
        id: doc_id.to_string(),
        resource_path: format!(
            "projects/42/locations/global/collections/default_collection/dataStores/{store}/branches/0/documents/{doc_id}"
        ),
        fields,
    }
}

pub fn employee_hit(id: &str, name: &str) -> SearchHit {
    hit(
        CollectionTag::EmployeeDirectory.as_str(),
        &format!("emp-{id}"),
        json!({ "employee_id": id, "employee_name": name }),
    )
}

pub fn page(hits: Vec<SearchHit>) -> SearchPage {
    SearchPage {
        hits,
        next_page_token: None,
    }
}
