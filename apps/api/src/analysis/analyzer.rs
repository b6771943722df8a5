//! Analyze pipeline: provider selection → prompt → model call → JSON extraction → decode.

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::extract::extract_json;
use crate::analysis::models::{AnalyzeRequest, AnalyzeResponse};
use crate::analysis::prompts::build_analyze_prompt;
use crate::config::LlmConfig;
use crate::errors::AnalyzeError;
use crate::llm_client::{provider_from_config, LlmProvider};

/// Where the analyzer gets its provider from.
#[derive(Clone)]
enum ProviderSource {
    /// Built from configuration on every request, so a misconfigured provider
    /// fails the request rather than the process.
    Configured { config: Arc<LlmConfig>, http: Client },
    Fixed(Arc<dyn LlmProvider>),
}

/// Runs resume analyses. Cheap to clone; shared through `AppState`.
#[derive(Clone)]
pub struct Analyzer {
    source: ProviderSource,
}

impl Analyzer {
    pub fn new(config: LlmConfig, http: Client) -> Self {
        Self {
            source: ProviderSource::Configured {
                config: Arc::new(config),
                http,
            },
        }
    }

    /// Uses `provider` for every request regardless of configuration.
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            source: ProviderSource::Fixed(provider),
        }
    }

    /// Resolves the provider for a request.
    pub fn provider(&self) -> Result<Arc<dyn LlmProvider>, AnalyzeError> {
        match &self.source {
            ProviderSource::Configured { config, http } => {
                Ok(provider_from_config(config, http.clone())?)
            }
            ProviderSource::Fixed(provider) => Ok(provider.clone()),
        }
    }

    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalyzeError> {
        let provider = self.provider()?;

        let span = info_span!(
            "analyze",
            analysis_id = %Uuid::new_v4(),
            provider = provider.name(),
            resume_chars = request.resume.chars().count(),
            jd_chars = request.job_description.chars().count(),
        );

        run_analysis(provider.as_ref(), request).instrument(span).await
    }
}

async fn run_analysis(
    provider: &dyn LlmProvider,
    request: &AnalyzeRequest,
) -> Result<AnalyzeResponse, AnalyzeError> {
    let prompt = build_analyze_prompt(&request.resume, &request.job_description);

    let reply = provider.generate(&prompt).await?;

    let json = extract_json(&reply)?;
    let response: AnalyzeResponse = serde_json::from_str(json)?;

    info!(
        "Analysis complete: match_score={}, missing_skills={}",
        response.match_score,
        response.missing_skills.len()
    );
    Ok(response)
}
