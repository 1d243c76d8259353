use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::search::service::SearchService;
use crate::storage::archive::ReviewArchive;
use crate::storage::documents::EmployeeDocuments;
use crate::storage::roster::EmployeeRoster;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
    pub archive: ReviewArchive,
    pub documents: EmployeeDocuments,
    pub roster: EmployeeRoster,
    /// Pluggable model backend. Default: Azure OpenAI `LlmClient`.
    pub llm: Arc<dyn ChatModel>,
    pub config: Config,
}
