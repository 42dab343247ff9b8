use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_client::{HttpClient, HttpRequest};

pub const DEFAULT_COMPLETION_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Failure taxonomy of the completion path. Never surfaced past the proxy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion service is not configured")]
    ConfigurationMissing,
    #[error("completion transport failed: {0}")]
    Transport(String),
    #[error("completion response could not be parsed: {0}")]
    ResponseParse(String),
    #[error("completion response violates schema at '{field}'")]
    SchemaViolation { field: String },
}

impl CompletionError {
    pub fn schema(field: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "ai.configuration_missing",
            Self::Transport(_) => "ai.transport",
            Self::ResponseParse(_) => "ai.response_parse",
            Self::SchemaViolation { .. } => "ai.schema_violation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Ask the service for a single JSON object.
    pub json_object: bool,
}

/// External completion service contract. Returns the raw message content.
pub trait CompletionClient: Send + Sync {
    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// Stand-in used when no credential is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredCompletionClient;

impl CompletionClient for UnconfiguredCompletionClient {
    fn complete<'a>(
        &'a self,
        _request: CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(async { Err(CompletionError::ConfigurationMissing) })
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// OpenAI-compatible `/chat/completions` client (Groq by default).
#[derive(Clone)]
pub struct GroqCompletionClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl Debug for GroqCompletionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqCompletionClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GroqCompletionClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_COMPLETION_BASE_URL),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionClient for GroqCompletionClient {
    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(async move {
            let body = serde_json::to_string(&ChatCompletionBody::from(&request))
                .map_err(|e| CompletionError::Transport(format!("failed to encode request: {e}")))?;

            let http_request = HttpRequest::post_json(self.endpoint(), body)
                .with_bearer(&self.api_key)
                .with_timeout(self.timeout);

            let response = self
                .http_client
                .execute(http_request)
                .await
                .map_err(|e| CompletionError::Transport(e.to_string()))?;

            if !response.is_success() {
                return Err(CompletionError::Transport(format!(
                    "completion service returned status {}",
                    response.status
                )));
            }

            let parsed: ChatCompletionResponse = serde_json::from_str(&response.body)
                .map_err(|e| CompletionError::ResponseParse(e.to_string()))?;

            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| CompletionError::ResponseParse(String::from("response has no message content")))
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionBody<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_object.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}
