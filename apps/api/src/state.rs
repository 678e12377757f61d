use std::sync::Arc;

use crate::interview::flow::InterviewSettings;
use crate::interview::store::SessionStore;
use crate::llm_client::LlmClient;
use crate::matrix::SkillsMatrix;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable session registry. Default: InMemorySessionStore.
    pub sessions: Arc<dyn SessionStore>,
    /// Loaded once at startup and never mutated.
    pub matrix: Arc<SkillsMatrix>,
    pub settings: Arc<InterviewSettings>,
}
