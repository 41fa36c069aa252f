//! Typed, validated generation on top of a raw completion backend.
//!
//! Flow: backend.complete(prompt, schema) → strip fences → parse into the
//! schema's Rust type → validate cardinality and required text → return.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::generation::schema::SchemaKind;
use crate::models::candidate::Resume;
use crate::models::job::{CoverLetter, InterviewQuestion, LearningResource, SkillGapEntry};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Response violated the {schema} schema: {reason}")]
    SchemaViolation {
        schema: &'static str,
        reason: String,
    },
}

/// A raw generation backend: one request/response round trip, no memory
/// across calls. Returns the response text as produced by the service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, schema: SchemaKind) -> Result<String, GenerationError>;
}

/// A value the generator can be asked for. Each implementor is bound to exactly
/// one [`SchemaKind`], so call sites are checked at compile time.
pub trait Generated: Sized + Serialize + DeserializeOwned + Send {
    const SCHEMA: SchemaKind;

    fn parse(text: &str) -> Result<Self, String> {
        serde_json::from_str(strip_json_fences(text)).map_err(|e| e.to_string())
    }

    fn validate(&self) -> Result<(), String>;
}

impl Generated for Resume {
    const SCHEMA: SchemaKind = SchemaKind::Resume;

    fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)
    }
}

impl Generated for Vec<SkillGapEntry> {
    const SCHEMA: SchemaKind = SchemaKind::SkillGap;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(self)?;
        self.iter()
            .try_for_each(|gap| require_text("skill_gap", &gap.skill_gap))
    }
}

impl Generated for Vec<LearningResource> {
    const SCHEMA: SchemaKind = SchemaKind::Learning;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(self)?;
        self.iter()
            .try_for_each(|resource| require_text("resource_name", &resource.resource_name))
    }
}

impl Generated for Vec<InterviewQuestion> {
    const SCHEMA: SchemaKind = SchemaKind::InterviewQuestion;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(self)?;
        self.iter()
            .try_for_each(|q| require_text("question", &q.question))
    }
}

impl Generated for CoverLetter {
    const SCHEMA: SchemaKind = SchemaKind::FreeText;

    /// Accepts plain prose or a JSON-encoded string.
    fn parse(text: &str) -> Result<Self, String> {
        let text = strip_json_fences(text);
        if text.starts_with('"') {
            if let Ok(unquoted) = serde_json::from_str::<String>(text) {
                return Ok(CoverLetter(unquoted.trim().to_string()));
            }
        }
        Ok(CoverLetter(text.to_string()))
    }

    fn validate(&self) -> Result<(), String> {
        require_text("cover letter", &self.0)
    }
}

fn require_non_empty<T>(items: &[T]) -> Result<(), String> {
    if items.is_empty() {
        Err("expected at least one entry".to_string())
    } else {
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("`{field}` is blank"))
    } else {
        Ok(())
    }
}

/// The single entry point pipelines use to talk to the generation service.
#[derive(Clone)]
pub struct SchemaGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl SchemaGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub async fn generate<T: Generated>(&self, prompt: &str) -> Result<T, GenerationError> {
        let schema = T::SCHEMA;
        let text = self.backend.complete(prompt, schema).await?;

        let violation = |reason: String| {
            warn!("Generation response violated {} schema: {}", schema.name(), reason);
            GenerationError::SchemaViolation {
                schema: schema.name(),
                reason,
            }
        };

        let value = T::parse(&text).map_err(violation)?;
        value.validate().map_err(violation)?;
        Ok(value)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
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
