use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing here changes between submissions.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable completion backend. Default: `LlmClient` against the Groq API.
    pub completion: Arc<dyn CompletionBackend>,
    pub config: Config,
}
