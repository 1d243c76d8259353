/// LLM Client — the single point of entry for all generative model calls.
///
/// ARCHITECTURAL RULE: No other module may call the chat completions API directly.
/// All model interactions MUST go through the `ChatModel` trait.
///
/// Backend: Azure OpenAI chat completions with strict JSON-schema output.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MAX_RETRIES: u32 = 3;
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model returned no content")]
    Empty,

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// `response_format` of a chat request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub description: String,
    pub schema: Value,
    pub strict: bool,
}

impl ResponseFormat {
    /// Strict structured output: the model may only emit JSON matching `schema`.
    pub fn strict_schema(name: &str, description: &str, schema: Value) -> Self {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: name.to_string(),
                description: description.to_string(),
                schema,
                strict: true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice. `None` when there are no choices or the content is empty.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// Deserializes the first choice as JSON. `Ok(None)` when nothing was generated.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>, LlmError> {
        match self.text() {
            Some(text) => Ok(Some(serde_json::from_str(strip_json_fences(text))?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// A chat-completion capable model.
///
/// Carried in `AppState` as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Azure OpenAI deployment settings. Read-only after startup.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    /// Wait before the first retry; doubles on each further retry.
    pub backoff_base: Duration,
}

/// Wraps the Azure OpenAI chat completions API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            settings,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.settings.deployment
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.deployment,
            self.settings.api_version
        )
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    /// Retries transport failures, 429 and 5xx with exponential backoff.
    /// Any response that arrives intact, empty or not, is returned as is.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = self.completions_url();
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s with the default base
                let delay = self.settings.backoff_base * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("api-key", &self.settings.api_key)
                .json(request)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}


#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, routing::post, Router};
    use serde_json::json;

    use super::testing::response_with;
    use super::*;

    /// Replies with the scripted statuses in order, then 200 with `{}` content.
    #[derive(Clone, Default)]
    struct ScriptedServer {
        replies: Arc<Mutex<VecDeque<(u16, Value)>>>,
        calls: Arc<AtomicUsize>,
    }

    async fn scripted_reply(State(server): State<ScriptedServer>) -> (StatusCode, String) {
        server.calls.fetch_add(1, Ordering::SeqCst);
        let (status, body) = server
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, completion("{}")));
        (StatusCode::from_u16(status).unwrap(), body.to_string())
    }

    fn completion(content: &str) -> Value {
        json!({
            "choices": [{ "message": { "content": content } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
        })
    }

    fn settings(endpoint: String) -> LlmSettings {
        LlmSettings {
            endpoint,
            api_key: "k".into(),
            deployment: "gpt-4o".into(),
            api_version: "2024-10-21".into(),
            backoff_base: Duration::from_millis(1),
        }
    }

    async fn serve(replies: Vec<(u16, Value)>) -> (LlmClient, ScriptedServer) {
        let server = ScriptedServer {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::default(),
        };
        let app = Router::new()
            .route("/openai/deployments/gpt-4o/chat/completions", post(scripted_reply))
            .with_state(server.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = LlmClient::new(settings(format!("http://{addr}"))).unwrap();
        (client, server)
    }

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            temperature: 0.0,
            response_format: None,
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_text_is_none_without_choices_or_content() {
        assert_eq!(ChatResponse::default().text(), None);
        assert_eq!(response_with(None).text(), None);
        assert_eq!(response_with(Some("  ")).text(), None);
        assert_eq!(response_with(Some("{}")).text(), Some("{}"));
    }

    #[test]
    fn test_json_parse_error_surfaces() {
        let response = response_with(Some("not json"));
        assert!(matches!(
            response.json::<serde_json::Value>(),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn test_request_serializes_strict_schema() {
        let request = ChatRequest {
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.0,
            response_format: Some(ResponseFormat::strict_schema(
                "persona",
                "test",
                json!({"type": "object"}),
            )),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["strict"], true);
        assert_eq!(value["response_format"]["json_schema"]["name"], "persona");
    }

    #[test]
    fn test_completions_url() {
        let client = LlmClient::new(LlmSettings {
            endpoint: "https://example.openai.azure.com/".into(),
            api_key: "k".into(),
            deployment: "gpt-4o".into(),
            api_version: "2024-10-21".into(),
            backoff_base: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
        );
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_until_success() {
        let unavailable = json!({ "error": { "message": "busy" } });
        let (client, server) = serve(vec![
            (503, unavailable.clone()),
            (503, unavailable),
            (200, completion("{\"ok\": true}")),
        ])
        .await;

        let response = client.complete(&request()).await.unwrap();
        assert_eq!(response.text(), Some("{\"ok\": true}"));
        assert_eq!(server.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let (client, server) = serve(vec![(429, json!({})), (200, completion("{}"))]).await;
        assert!(client.complete(&request()).await.is_ok());
        assert_eq!(server.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let busy = json!({ "error": { "message": "busy" } });
        let (client, server) = serve(vec![(500, busy.clone()), (502, busy.clone()), (503, busy)]).await;

        let result = client.complete(&request()).await;
        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
        assert_eq!(server.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (client, server) = serve(vec![(
            400,
            json!({ "error": { "message": "invalid schema" } }),
        )])
        .await;

        let result = client.complete(&request()).await;
        assert!(matches!(
            result,
            Err(LlmError::Api { status: 400, ref message }) if message == "invalid schema"
        ));
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_content_is_not_retried() {
        let (client, server) = serve(vec![(200, completion(""))]).await;

        let response = client.complete(&request()).await.unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_retried_then_surfaced() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = LlmClient::new(settings(format!("http://{addr}"))).unwrap();
        assert!(matches!(
            client.complete(&request()).await,
            Err(LlmError::Http(_))
        ));
    }
}
