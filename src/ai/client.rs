//! LLM backend clients
//!
//! Both backends share the [`Summarizer`] contract. Prompt wording, payload
//! shape and response parsing live entirely inside each implementation.

use std::time::Instant;

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

use super::prompt_builder::{CLOUD_SYSTEM_PROMPT, build_cloud_prompt, build_local_prompt};
use crate::core::config::{AppConfig, BackendKind, CloudBackendConfig, LocalBackendConfig};
use crate::core::models::GenerationParams;
use crate::errors::SummarizerError;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn backend(&self) -> BackendKind;

    fn model(&self) -> &str;

    /// Summarize `text` with a single blocking round trip to the backend.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses and responses without the expected
    /// summary field are all returned as [`SummarizerError`]; nothing panics.
    async fn summarize(&self, text: &str) -> Result<String, SummarizerError>;
}

/// Build the backend selected in `config`.
pub fn create_summarizer(config: &AppConfig) -> Box<dyn Summarizer> {
    match config.backend {
        BackendKind::Local => Box::new(LocalBackend::new(config.local.clone())),
        BackendKind::Cloud => {
            if config.cloud.has_placeholder_key() {
                warn!("GROQ_API_KEY is not configured; cloud requests will fail authentication");
            }
            Box::new(CloudBackend::new(config.cloud.clone()))
        }
    }
}

/// Body of a local generate request. The endpoint takes no sampling options.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: Option<String>,
}

/// Body of a chat completions request.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Client for a locally hosted generate endpoint (`{model, prompt, stream}`).
pub struct LocalBackend {
    http: Client,
    config: LocalBackendConfig,
}

impl LocalBackend {
    #[must_use]
    pub fn new(config: LocalBackendConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn request_body(&self, text: &str) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.config.model,
            prompt: build_local_prompt(text),
            stream: false,
        }
    }
}

#[async_trait]
impl Summarizer for LocalBackend {
    fn backend(&self) -> BackendKind {
        BackendKind::Local
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn summarize(&self, text: &str) -> Result<String, SummarizerError> {
        let body = self.request_body(text);
        let span = request_span(self.backend(), self.model());

        async {
            let response_json =
                post_json(self.http.post(&self.config.url), &body, estimate_tokens(text)).await?;

            response_json
                .get("response")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    SummarizerError::MalformedResponse("missing 'response' field".to_string())
                })
        }
        .instrument(span)
        .await
    }
}

/// Client for an OpenAI-compatible chat completions endpoint with bearer auth.
pub struct CloudBackend {
    http: Client,
    config: CloudBackendConfig,
    params: GenerationParams,
}

impl CloudBackend {
    #[must_use]
    pub fn new(config: CloudBackendConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            params: GenerationParams::default(),
        }
    }

    pub fn build_prompt(&self, text: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(CLOUD_SYSTEM_PROMPT.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(build_cloud_prompt(text)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    pub fn request_body(&self, text: &str) -> ChatRequest<'_> {
        let messages = self
            .build_prompt(text)
            .into_iter()
            .map(|msg| {
                let role = match msg.role {
                    MessageRole::system => "system",
                    MessageRole::user => "user",
                    MessageRole::assistant => "assistant",
                    MessageRole::function => "function",
                    MessageRole::tool => "tool",
                };

                let content = match msg.content {
                    Content::Text(text) => Some(text),
                    Content::ImageUrl(_) => None,
                };

                ChatMessage { role, content }
            })
            .collect();

        ChatRequest {
            model: &self.config.model,
            messages,
            params: self.params,
        }
    }
}

#[async_trait]
impl Summarizer for CloudBackend {
    fn backend(&self) -> BackendKind {
        BackendKind::Cloud
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn summarize(&self, text: &str) -> Result<String, SummarizerError> {
        let body = self.request_body(text);
        let span = request_span(self.backend(), self.model());

        async {
            let request = self
                .http
                .post(&self.config.url)
                .bearer_auth(&self.config.api_key);
            let response_json = post_json(request, &body, estimate_tokens(text)).await?;

            response_json
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    SummarizerError::MalformedResponse(
                        "missing 'choices[0].message.content'".to_string(),
                    )
                })
        }
        .instrument(span)
        .await
    }
}

fn request_span(backend: BackendKind, model: &str) -> tracing::Span {
    tracing::info_span!(
        "summarize",
        request_id = %Uuid::new_v4(),
        backend = %backend,
        model = %model
    )
}

/// Send `body` and return the parsed JSON of a 2xx response. The status is
/// checked before the body is parsed.
async fn post_json<B: Serialize>(
    request: reqwest::RequestBuilder,
    body: &B,
    estimated_input_tokens: usize,
) -> Result<Value, SummarizerError> {
    #[cfg(feature = "debug-logs")]
    if let Ok(rendered) = serde_json::to_string_pretty(body) {
        debug!("Request body:\n{}", rendered);
    }

    info!(estimated_input_tokens, "Sending summarization request");
    let started = Instant::now();

    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| SummarizerError::HttpError(format!("request failed: {}", error_chain(&e))))?;

    let status = response.status();
    let response_text = response.text().await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if !status.is_success() {
        warn!(status = status.as_u16(), elapsed_ms, "Backend returned error status");
        return Err(SummarizerError::ApiError {
            status: status.as_u16(),
            body: response_text,
        });
    }

    debug!(elapsed_ms, bytes = response_text.len(), "Backend responded");

    serde_json::from_str(&response_text).map_err(|e| {
        SummarizerError::MalformedResponse(format!("response body is not JSON: {e}"))
    })
}

/// Render an error with its `source()` chain, since reqwest keeps the
/// underlying cause (e.g. "Connection refused") out of its own message.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
