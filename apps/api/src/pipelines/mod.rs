//! Pipeline Orchestrator.
//!
//! Each pipeline is a fixed composition:
//!   load context → render prompt → generate (validated) → reconcile → return.
//! Validation and not-found checks run before the generation call; persistence
//! runs only after a value passed schema validation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::context::assembler::{load_context, CandidateContext};
use crate::documents::{DocumentFetcher, DocumentRef, FetchError};
use crate::generation::generator::{Generated, GenerationError, SchemaGenerator};
use crate::models::candidate::Resume;
use crate::models::job::{
    flatten_questions, CoverLetter, InterviewQuestion, LearningResource, SkillGapEntry,
    COVER_LETTER_FIELD, INTERVIEW_QUESTIONS_FIELD,
};
use crate::pipelines::reconcile::{Reconciler, WriteOp};
use crate::store::{paths, DocPath, DocumentStore, StoreError};

pub mod handlers;
pub mod prompts;
pub mod reconcile;


#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InputMissing(String),

    #[error("Candidate {0} not found")]
    CandidateNotFound(String),

    #[error("Job {job_id} not found for candidate {candidate_id}")]
    JobNotFound {
        candidate_id: String,
        job_id: String,
    },

    #[error("Resume document could not be fetched: {0}")]
    DocumentFetchFailed(#[from] FetchError),

    #[error("Resume document {0} has no text content")]
    EmptyDocument(String),

    #[error("{0}")]
    GenerationFailed(String),

    #[error("{0}")]
    SchemaViolation(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(#[from] StoreError),
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Failed(_) => PipelineError::GenerationFailed(err.to_string()),
            GenerationError::SchemaViolation { .. } => {
                PipelineError::SchemaViolation(err.to_string())
            }
        }
    }
}

/// Validates a caller-supplied identifier. Identifiers become path segments,
/// so blanks and `/` are rejected.
pub fn require_id(field: &str, value: Option<&str>) -> Result<String, PipelineError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(PipelineError::InputMissing(format!("{field} is required")));
    }
    if value.contains('/') {
        return Err(PipelineError::InputMissing(format!(
            "{field} must not contain '/'"
        )));
    }
    Ok(value.to_string())
}

/// A validated (candidate, job) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTarget {
    pub candidate_id: String,
    pub job_id: String,
}

impl JobTarget {
    pub fn new(candidate_id: Option<&str>, job_id: Option<&str>) -> Result<Self, PipelineError> {
        Ok(Self {
            candidate_id: require_id("candidate_id", candidate_id)?,
            job_id: require_id("job_id", job_id)?,
        })
    }
}

/// The five pipelines, bound to their collaborators at construction.
pub struct Pipelines {
    store: Arc<dyn DocumentStore>,
    generator: SchemaGenerator,
    fetcher: Arc<dyn DocumentFetcher>,
    document_url_root: String,
}

impl Pipelines {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        generator: SchemaGenerator,
        fetcher: Arc<dyn DocumentFetcher>,
        document_url_root: impl Into<String>,
    ) -> Self {
        Self {
            store,
            generator,
            fetcher,
            document_url_root: document_url_root.into(),
        }
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.store.as_ref())
    }

    /// Extract-Resume: fetch → generate(Resume) → merge profile, append
    /// education and experience.
    ///
    /// Not idempotent: every run appends its education and experience entries
    /// again, even when they match existing ones.
    pub async fn extract_resume(
        &self,
        candidate_id: Option<&str>,
        resume_url: Option<&str>,
    ) -> Result<Resume, PipelineError> {
        let candidate_id = require_id("candidate_id", candidate_id)?;
        let resume_url = resume_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PipelineError::InputMissing("resume_url is required".to_string()))?;
        let document = DocumentRef::parse(resume_url, &self.document_url_root).ok_or_else(|| {
            PipelineError::InputMissing(format!(
                "resume_url '{resume_url}' does not name a container and object"
            ))
        })?;

        info!("Extracting resume {} for candidate {}", document, candidate_id);

        let text = self.fetcher.fetch_text(&document).await.map_err(|e| {
            warn!("Resume fetch failed for candidate {}: {}", candidate_id, e);
            PipelineError::DocumentFetchFailed(e)
        })?;
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyDocument(document.to_string()));
        }

        let resume: Resume = self
            .generator
            .generate(&prompts::resume_prompt(&text))
            .await?;

        let candidate = paths::candidate(&candidate_id);
        self.reconciler()
            .apply(vec![
                WriteOp::merge_upsert(candidate.clone(), &resume.profile())?,
                WriteOp::append(paths::education(&candidate), &resume.education)?,
                WriteOp::append(paths::experience(&candidate), &resume.experience)?,
            ])
            .await?;

        info!(
            "Extracted resume for candidate {}: {} education, {} experience, {} skills",
            candidate_id,
            resume.education.len(),
            resume.experience.len(),
            resume.skills.len()
        );
        Ok(resume)
    }

    /// Skill-Gap: replace-all under `jobs/{job}/skills_gap_analysis`.
    pub async fn skill_gap(&self, target: &JobTarget) -> Result<Vec<SkillGapEntry>, PipelineError> {
        let (gaps, job) = self
            .derive::<Vec<SkillGapEntry>>(target, prompts::SKILL_GAP_PROMPT)
            .await?;
        self.reconciler()
            .apply(vec![WriteOp::replace_all(
                paths::skills_gap_analysis(&job),
                &gaps,
            )?])
            .await?;
        Ok(gaps)
    }

    /// Learning-Pathway: replace-all under `jobs/{job}/learning_pathway`.
    pub async fn learning_pathway(
        &self,
        target: &JobTarget,
    ) -> Result<Vec<LearningResource>, PipelineError> {
        let (resources, job) = self
            .derive::<Vec<LearningResource>>(target, prompts::LEARNING_PATHWAY_PROMPT)
            .await?;
        self.reconciler()
            .apply(vec![WriteOp::replace_all(
                paths::learning_pathway(&job),
                &resources,
            )?])
            .await?;
        Ok(resources)
    }

    /// Interview-Questions: merge-upsert the flattened questions onto the job.
    pub async fn interview_questions(
        &self,
        target: &JobTarget,
    ) -> Result<Vec<InterviewQuestion>, PipelineError> {
        let (questions, job) = self
            .derive::<Vec<InterviewQuestion>>(target, prompts::INTERVIEW_QUESTIONS_PROMPT)
            .await?;
        let fields = serde_json::json!({ INTERVIEW_QUESTIONS_FIELD: flatten_questions(&questions) });
        self.reconciler()
            .apply(vec![WriteOp::merge_upsert(job, &fields)?])
            .await?;
        Ok(questions)
    }

    /// Cover-Letter: merge-upsert the letter text onto the job.
    pub async fn cover_letter(&self, target: &JobTarget) -> Result<CoverLetter, PipelineError> {
        let (letter, job) = self
            .derive::<CoverLetter>(target, prompts::COVER_LETTER_PROMPT)
            .await?;
        let fields = serde_json::json!({ COVER_LETTER_FIELD: &letter });
        self.reconciler()
            .apply(vec![WriteOp::merge_upsert(job, &fields)?])
            .await?;
        Ok(letter)
    }

    /// Shared front half of the derived pipelines: context → prompt → generate.
    async fn derive<T: Generated>(
        &self,
        target: &JobTarget,
        template: &str,
    ) -> Result<(T, DocPath), PipelineError> {
        let context: CandidateContext =
            load_context(self.store.as_ref(), &target.candidate_id, Some(&target.job_id)).await?;
        let job = paths::job(&context.candidate, &target.job_id);

        info!(
            "Generating {} for candidate {} job {}",
            T::SCHEMA.name(),
            target.candidate_id,
            target.job_id
        );
        let prompt = prompts::with_context(template, &context.render());
        let value = self.generator.generate::<T>(&prompt).await?;
        Ok((value, job))
    }
}
