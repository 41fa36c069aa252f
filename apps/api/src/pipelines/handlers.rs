//! Axum route handlers for the five pipelines.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::candidate::Resume;
use crate::models::job::{CoverLetter, InterviewQuestion, LearningResource, SkillGapEntry};
use crate::pipelines::JobTarget;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Identifiers are optional on the wire so that a missing one is reported as
/// a validation error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct ExtractResumeRequest {
    #[serde(default, alias = "userId", alias = "candidateId")]
    pub candidate_id: Option<String>,
    #[serde(default, alias = "resumeUrl")]
    pub resume_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    #[serde(default, alias = "userId", alias = "candidateId")]
    pub candidate_id: Option<String>,
    #[serde(default, alias = "jobId")]
    pub job_id: Option<String>,
}

impl JobRequest {
    fn target(&self) -> Result<JobTarget, AppError> {
        Ok(JobTarget::new(
            self.candidate_id.as_deref(),
            self.job_id.as_deref(),
        )?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/extract
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    Json(req): Json<ExtractResumeRequest>,
) -> Result<Json<Resume>, AppError> {
    let resume = state
        .pipelines
        .extract_resume(req.candidate_id.as_deref(), req.resume_url.as_deref())
        .await?;
    Ok(Json(resume))
}

/// POST /api/v1/jobs/skills-gap
pub async fn handle_skills_gap(
    State(state): State<AppState>,
    Json(req): Json<JobRequest>,
) -> Result<Json<Vec<SkillGapEntry>>, AppError> {
    let gaps = state.pipelines.skill_gap(&req.target()?).await?;
    Ok(Json(gaps))
}

/// POST /api/v1/jobs/learning-pathway
pub async fn handle_learning_pathway(
    State(state): State<AppState>,
    Json(req): Json<JobRequest>,
) -> Result<Json<Vec<LearningResource>>, AppError> {
    let resources = state.pipelines.learning_pathway(&req.target()?).await?;
    Ok(Json(resources))
}

/// POST /api/v1/jobs/interview-questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    Json(req): Json<JobRequest>,
) -> Result<Json<Vec<InterviewQuestion>>, AppError> {
    let questions = state.pipelines.interview_questions(&req.target()?).await?;
    Ok(Json(questions))
}

/// POST /api/v1/jobs/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<JobRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    let letter = state.pipelines.cover_letter(&req.target()?).await?;
    Ok(Json(letter))
}
