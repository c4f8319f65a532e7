use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm::CareerAdvisor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable generative backend. Default: GeminiClient. Swapped for a stub in tests.
    pub advisor: Arc<dyn CareerAdvisor>,
    #[allow(dead_code)]
    pub config: Config,
}
