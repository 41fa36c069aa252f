pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipelines::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resume/extract",
            post(handlers::handle_extract_resume),
        )
        .route("/api/v1/jobs/skills-gap", post(handlers::handle_skills_gap))
        .route(
            "/api/v1/jobs/learning-pathway",
            post(handlers::handle_learning_pathway),
        )
        .route(
            "/api/v1/jobs/interview-questions",
            post(handlers::handle_interview_questions),
        )
        .route(
            "/api/v1/jobs/cover-letter",
            post(handlers::handle_cover_letter),
        )
        .with_state(state)
}
