//! LLM Client: HTTP client for the hosted generation service.
//!
//! ARCHITECTURAL RULE: only `generation::generator::SchemaGenerator` calls this
//! client, through the `CompletionBackend` trait.
//!
//! Model: gemini-1.5-flash (hardcoded)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::GenerationSettings;
use crate::generation::generator::{CompletionBackend, GenerationError};
use crate::generation::schema::SchemaKind;

pub mod prompts;

/// The model used for all generation calls.
pub const MODEL: &str = "gemini-1.5-flash";
const API_VERSION: &str = "v1beta";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation call timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked by the generation service: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        GenerationError::Failed(err.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn build_request(prompt: &str, schema: SchemaKind) -> GenerateContentRequest<'_> {
    let response_mime_type = if schema.is_structured() {
        "application/json"
    } else {
        "text/plain"
    };
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: prompt }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: prompts::system_instruction(schema),
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type,
            response_schema: schema.response_schema(),
        },
    }
}

/// Client for the `generateContent` endpoint. One call per request; retrying is
/// left to API clients.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(settings: &GenerationSettings) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: format!(
                "{}/{}/models/{}:generateContent",
                settings.endpoint.trim_end_matches('/'),
                API_VERSION,
                MODEL
            ),
            api_key: settings.api_key.clone(),
            timeout,
        })
    }

    /// Makes a single call to the generation service, returning the full response.
    pub async fn call(
        &self,
        prompt: &str,
        schema: SchemaKind,
    ) -> Result<GenerateContentResponse, LlmError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(prompt, schema))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| self.transport_error(e))?;

        let finish_reason = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("unknown");
        let (prompt_tokens, output_tokens) = parsed
            .usage_metadata
            .as_ref()
            .map(|u| (u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();
        debug!(
            "Generation call succeeded ({}): finish_reason={}, prompt_tokens={}, output_tokens={}",
            schema.name(),
            finish_reason,
            prompt_tokens,
            output_tokens
        );

        Ok(parsed)
    }

    fn transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Http(err)
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn complete(&self, prompt: &str, schema: SchemaKind) -> Result<String, GenerationError> {
        let response = self.call(prompt, schema).await?;
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(LlmError::Blocked(reason).into());
        }
        Ok(response.text().ok_or(LlmError::EmptyContent)?)
    }
}
