//! Context Assembler: read-only projection of a candidate (and optionally one
//! of their jobs) into the text block embedded in generation prompts.

use serde_json::Value;

use crate::models::candidate::CandidateProfile;
use crate::models::job::DERIVED_JOB_FIELDS;
use crate::pipelines::PipelineError;
use crate::store::{paths, DocPath, DocumentStore, Fields};

#[derive(Debug, Clone)]
pub struct CandidateContext {
    pub candidate: DocPath,
    pub profile: CandidateProfile,
    pub education: Vec<Fields>,
    pub experience: Vec<Fields>,
    /// Job document fields with derived outputs removed.
    pub job: Option<Fields>,
}

/// Loads everything a derived pipeline needs.
///
/// Existence checks run first so a missing candidate or job fails before any
/// collection is read.
pub async fn load_context(
    store: &dyn DocumentStore,
    candidate_id: &str,
    job_id: Option<&str>,
) -> Result<CandidateContext, PipelineError> {
    let candidate = paths::candidate(candidate_id);
    let candidate_doc = store
        .get(&candidate)
        .await?
        .ok_or_else(|| PipelineError::CandidateNotFound(candidate_id.to_string()))?;

    let job = match job_id {
        Some(job_id) => {
            let job = paths::job(&candidate, job_id);
            let job_doc = store
                .get(&job)
                .await?
                .ok_or_else(|| PipelineError::JobNotFound {
                    candidate_id: candidate_id.to_string(),
                    job_id: job_id.to_string(),
                })?;
            let mut fields = job_doc.data;
            for derived in DERIVED_JOB_FIELDS {
                fields.remove(derived);
            }
            Some(fields)
        }
        None => None,
    };

    let profile: CandidateProfile = candidate_doc.decode()?;
    let education = store
        .list_children(&paths::education(&candidate))
        .await?
        .into_iter()
        .map(|doc| doc.data)
        .collect();
    let experience = store
        .list_children(&paths::experience(&candidate))
        .await?
        .into_iter()
        .map(|doc| doc.data)
        .collect();

    Ok(CandidateContext {
        candidate,
        profile,
        education,
        experience,
        job,
    })
}

impl CandidateContext {
    /// Renders the context block substituted into prompt templates.
    pub fn render(&self) -> String {
        let skills = if self.profile.skills.is_empty() {
            "none listed".to_string()
        } else {
            self.profile.skills.join(", ")
        };
        let mut out = format!(
            "CANDIDATE NAME: {}\n\nCANDIDATE SKILLS: {}\n\nEDUCATION HISTORY:\n{:#}\n\nWORK EXPERIENCE:\n{:#}\n",
            self.profile.name,
            skills,
            as_json_list(&self.education),
            as_json_list(&self.experience),
        );
        if let Some(job) = &self.job {
            out.push_str(&format!(
                "\nJOB DESCRIPTION:\n{:#}\n",
                Value::Object(job.clone())
            ));
        }
        out
    }
}

fn as_json_list(entries: &[Fields]) -> Value {
    Value::Array(entries.iter().cloned().map(Value::Object).collect())
}
