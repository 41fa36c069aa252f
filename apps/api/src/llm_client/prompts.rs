// System instructions shared by every generation call.
// Per-pipeline prompt templates live in pipelines/prompts.rs.

use crate::generation::schema::SchemaKind;

/// Attached to every schema-constrained call.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise career-coaching assistant. \
    You MUST respond with JSON that matches the provided response schema exactly. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT invent facts that are not supported by the candidate data.";

/// Attached to free-text calls.
pub const PROSE_SYSTEM: &str = "You are a precise career-coaching assistant. \
    Respond with the requested document only, as plain text. \
    Do NOT wrap the text in JSON or markdown code fences. \
    Do NOT invent facts that are not supported by the candidate data.";

pub fn system_instruction(schema: SchemaKind) -> &'static str {
    if schema.is_structured() {
        JSON_ONLY_SYSTEM
    } else {
        PROSE_SYSTEM
    }
}
