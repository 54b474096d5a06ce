use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextCompletion;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Gemini in production; tests swap in a scripted fake.
    pub llm: Arc<dyn TextCompletion>,
    pub config: Config,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(llm: Arc<dyn TextCompletion>, config: Config) -> Self {
        let sessions = Arc::new(SessionRegistry::new(Arc::clone(&llm), config.max_sessions));
        Self {
            llm,
            config,
            sessions,
        }
    }
}
