use serde::{Deserialize, Serialize};

/// Field on the job document holding the flattened interview questions.
pub const INTERVIEW_QUESTIONS_FIELD: &str = "interview_questions";
/// Field on the job document holding the generated cover letter.
pub const COVER_LETTER_FIELD: &str = "cover_letter";

/// Fields written onto the job document by derived pipelines.
/// These are never fed back into prompts.
pub const DERIVED_JOB_FIELDS: [&str; 2] = [INTERVIEW_QUESTIONS_FIELD, COVER_LETTER_FIELD];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillGapEntry {
    pub skill_gap: String,
    pub description: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningResource {
    pub resource_name: String,
    pub link: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewQuestion {
    pub question: String,
}

/// Free-text cover letter body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CoverLetter(pub String);

/// Projects the generated question records into the flat list stored on the job.
pub fn flatten_questions(questions: &[InterviewQuestion]) -> Vec<String> {
    questions.iter().map(|q| q.question.clone()).collect()
}
