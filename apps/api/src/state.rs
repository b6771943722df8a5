use crate::analysis::analyzer::Analyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resolves the configured LLM provider per request and runs the analysis pipeline.
    pub analyzer: Analyzer,
}
