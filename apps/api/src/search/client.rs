//! HTTP client for the Discovery Engine search API.
//!
//! Scoped searches go to a data store serving config, federated searches to the
//! engine serving config that spans every data store:
//!
//! ```text
//! POST https://{loc-}discoveryengine.googleapis.com/v1/projects/{p}/locations/{loc}
//!      /collections/default_collection/dataStores/{store}/servingConfigs/default_search:search
//! POST .../collections/default_collection/engines/{engine}/servingConfigs/default_search:search
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::search::collection::{CollectionCatalog, CollectionTag};
use crate::search::mapper::FieldMap;
use crate::search::{SearchBackend, SearchError, SearchHit, SearchPage, SearchRequest};

const API_HOST: &str = "discoveryengine.googleapis.com";
const API_VERSION: &str = "v1";
const SERVING_CONFIG: &str = "default_search";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to address the search service. Read-only after startup.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub project_id: Option<String>,
    pub location: String,
    pub engine_id: Option<String>,
    /// OAuth access token sent as a bearer token, if any.
    pub api_key: Option<String>,
    pub language_code: String,
    pub time_zone: String,
    pub catalog: CollectionCatalog,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSearchRequest<'a> {
    query: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    language_code: &'a str,
    spell_correction_spec: SpellCorrectionSpec,
    user_info: UserInfo<'a>,
}

#[derive(Debug, Serialize)]
struct SpellCorrectionSpec {
    mode: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo<'a> {
    time_zone: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSearchResponse {
    #[serde(default)]
    results: Vec<WireResult>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    #[serde(default)]
    id: String,
    #[serde(default)]
    document: WireDocument,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    struct_data: Option<FieldMap>,
    #[serde(default)]
    derived_struct_data: Option<FieldMap>,
}

impl WireSearchResponse {
    fn into_page(self) -> SearchPage {
        let hits = self
            .results
            .into_iter()
            .map(|result| SearchHit {
                id: result.id,
                resource_path: result.document.name,
                fields: result
                    .document
                    .struct_data
                    .or(result.document.derived_struct_data)
                    .unwrap_or_default(),
            })
            .collect();

        SearchPage {
            hits,
            next_page_token: self.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Clone)]
pub struct VertexSearchClient {
    client: Client,
    settings: SearchSettings,
}

impl VertexSearchClient {
    pub fn new(settings: SearchSettings) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client, settings })
    }

    fn base_url(&self) -> String {
        if self.settings.location == "global" {
            format!("https://{API_HOST}")
        } else {
            format!("https://{}-{API_HOST}", self.settings.location)
        }
    }

    /// URL of the search method for `scope`. Fails if the project (or, for
    /// federated search, the engine) is not configured.
    pub fn search_url(&self, scope: CollectionTag) -> Result<String, SearchError> {
        let project = self.settings.project_id.as_deref().ok_or_else(|| {
            SearchError::Configuration("SEARCH_PROJECT_ID is not set".to_string())
        })?;

        let target = match scope {
            CollectionTag::All => {
                let engine = self.settings.engine_id.as_deref().ok_or_else(|| {
                    SearchError::Configuration(
                        "SEARCH_ENGINE_ID is required for federated search".to_string(),
                    )
                })?;
                format!("engines/{engine}")
            }
            tag => {
                let store = self.settings.catalog.store_id(tag).ok_or_else(|| {
                    SearchError::Configuration(format!(
                        "no data store configured for {}",
                        tag.as_str()
                    ))
                })?;
                format!("dataStores/{store}")
            }
        };

        Ok(format!(
            "{}/{API_VERSION}/projects/{project}/locations/{}/collections/default_collection/{target}/servingConfigs/{SERVING_CONFIG}:search",
            self.base_url(),
            self.settings.location,
        ))
    }
}

#[async_trait]
impl SearchBackend for VertexSearchClient {
    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        let url = self.search_url(request.scope)?;

        let body = WireSearchRequest {
            query: &request.query,
            page_size: request.page_size,
            page_token: request.page_token.as_deref(),
            filter: request.filter.as_deref(),
            language_code: &self.settings.language_code,
            spell_correction_spec: SpellCorrectionSpec { mode: "AUTO" },
            user_info: UserInfo {
                time_zone: &self.settings.time_zone,
            },
        };

        let mut http_request = self.client.post(&url).json(&body);
        if let Some(token) = &self.settings.api_key {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Search API returned {status} for {:?}", request.scope);
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let page = serde_json::from_str::<WireSearchResponse>(&text)?.into_page();
        debug!(
            "Search {:?} '{}' returned {} hits",
            request.scope,
            request.query,
            page.hits.len()
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SearchSettings {
        SearchSettings {
            project_id: Some("218635".into()),
            location: "global".into(),
            engine_id: Some("skillsearch".into()),
            api_key: None,
            language_code: "ja".into(),
            time_zone: "Asia/Tokyo".into(),
            catalog: CollectionCatalog::default(),
        }
    }

    #[test]
    fn test_scoped_url() {
        let client = VertexSearchClient::new(settings()).unwrap();
        assert_eq!(
            client.search_url(CollectionTag::EmployeeDirectory).unwrap(),
            "https://discoveryengine.googleapis.com/v1/projects/218635/locations/global/collections/default_collection/dataStores/employee_info/servingConfigs/default_search:search"
        );
    }

    #[test]
    fn test_federated_url_uses_regional_host() {
        let mut s = settings();
        s.location = "us".into();
        let client = VertexSearchClient::new(s).unwrap();
        assert_eq!(
            client.search_url(CollectionTag::All).unwrap(),
            "https://us-discoveryengine.googleapis.com/v1/projects/218635/locations/us/collections/default_collection/engines/skillsearch/servingConfigs/default_search:search"
        );
    }

    #[test]
    fn test_missing_project_is_configuration_error() {
        let mut s = settings();
        s.project_id = None;
        let client = VertexSearchClient::new(s).unwrap();
        assert!(matches!(
            client.search_url(CollectionTag::HalfYearReview),
            Err(SearchError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_engine_only_affects_federated() {
        let mut s = settings();
        s.engine_id = None;
        let client = VertexSearchClient::new(s).unwrap();
        assert!(client.search_url(CollectionTag::MonthlyReview).is_ok());
        assert!(matches!(
            client.search_url(CollectionTag::All),
            Err(SearchError::Configuration(_))
        ));
    }

    #[test]
    fn test_response_into_page() {
        let body = r#"{
            "results": [
                {
                    "id": "42",
                    "document": {
                        "name": "projects/1/locations/global/collections/default_collection/dataStores/employee_info/branches/0/documents/42",
                        "id": "42",
                        "structData": {"employee_id": "E42", "employee_name": "Kato"}
                    }
                },
                {
                    "id": "cv-7",
                    "document": {
                        "name": "projects/1/locations/global/collections/default_collection/dataStores/cv/branches/0/documents/cv-7",
                        "derivedStructData": {"title": "cv.pdf"}
                    }
                }
            ],
            "totalSize": 2,
            "nextPageToken": ""
        }"#;
        let page = serde_json::from_str::<WireSearchResponse>(body)
            .unwrap()
            .into_page();

        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.hits[0].fields["employee_id"], "E42");
        assert!(page.hits[0].resource_path.contains("/dataStores/employee_info/"));
        assert_eq!(page.hits[1].fields["title"], "cv.pdf");
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn test_empty_response_is_empty_page() {
        let page = serde_json::from_str::<WireSearchResponse>("{}")
            .unwrap()
            .into_page();
        assert!(page.hits.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = WireSearchRequest {
            query: "E1",
            page_size: 10,
            page_token: None,
            filter: Some("employee_id: ANY(\"E1\")"),
            language_code: "ja",
            spell_correction_spec: SpellCorrectionSpec { mode: "AUTO" },
            user_info: UserInfo {
                time_zone: "Asia/Tokyo",
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["pageSize"], 10);
        assert_eq!(value["languageCode"], "ja");
        assert_eq!(value["spellCorrectionSpec"]["mode"], "AUTO");
        assert_eq!(value["userInfo"]["timeZone"], "Asia/Tokyo");
        assert!(value.get("pageToken").is_none());
    }
}
