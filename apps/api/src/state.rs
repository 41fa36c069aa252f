use std::sync::Arc;

use crate::pipelines::Pipelines;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipelines: Arc<Pipelines>,
}
