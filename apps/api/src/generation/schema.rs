//! Response schemas, one tagged variant per pipeline.

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// `{name, education[], experience[], skills[]}`
    Resume,
    /// Sequence of `{skill_gap, description, recommendations[]}`
    SkillGap,
    /// Sequence of `{resource_name, link, summary}`
    Learning,
    /// Sequence of `{question}`
    InterviewQuestion,
    /// Unconstrained prose
    FreeText,
}

impl SchemaKind {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Resume => "Resume",
            SchemaKind::SkillGap => "SkillGap",
            SchemaKind::Learning => "Learning",
            SchemaKind::InterviewQuestion => "InterviewQuestion",
            SchemaKind::FreeText => "FreeText",
        }
    }

    pub fn is_structured(&self) -> bool {
        !matches!(self, SchemaKind::FreeText)
    }

    /// Response schema in the OpenAPI subset accepted by the generation service.
    /// `None` for free text.
    pub fn response_schema(&self) -> Option<Value> {
        match self {
            SchemaKind::Resume => Some(object(&[
                ("name", string()),
                (
                    "education",
                    array(object(&[
                        ("institution", string()),
                        ("degree", string()),
                        ("start_date", string()),
                        ("end_date", string()),
                    ])),
                ),
                (
                    "experience",
                    array(object(&[
                        ("company", string()),
                        ("role", string()),
                        ("start_date", string()),
                        ("end_date", string()),
                        ("responsibilities", string()),
                    ])),
                ),
                ("skills", array(string())),
            ])),
            SchemaKind::SkillGap => Some(array(object(&[
                ("skill_gap", string()),
                ("description", string()),
                ("recommendations", array(string())),
            ]))),
            SchemaKind::Learning => Some(array(object(&[
                ("resource_name", string()),
                ("link", string()),
                ("summary", string()),
            ]))),
            SchemaKind::InterviewQuestion => Some(array(object(&[("question", string())]))),
            SchemaKind::FreeText => None,
        }
    }
}

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn array(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

fn object(fields: &[(&str, Value)]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text_has_no_schema() {
        assert!(SchemaKind::FreeText.response_schema().is_none());
        assert!(!SchemaKind::FreeText.is_structured());
    }

    #[test]
    fn test_sequence_schemas_are_arrays() {
        for kind in [
            SchemaKind::SkillGap,
            SchemaKind::Learning,
            SchemaKind::InterviewQuestion,
        ] {
            let schema = kind.response_schema().unwrap();
            assert_eq!(schema["type"], "ARRAY", "{} must be a sequence", kind.name());
            assert_eq!(schema["items"]["type"], "OBJECT");
        }
    }

    #[test]
    fn test_resume_schema_requires_all_fields() {
        let schema = SchemaKind::Resume.response_schema().unwrap();
        assert_eq!(
            schema["required"],
            json!(["name", "education", "experience", "skills"])
        );
        assert_eq!(
            schema["properties"]["experience"]["items"]["required"],
            json!(["company", "role", "start_date", "end_date", "responsibilities"])
        );
    }
}
