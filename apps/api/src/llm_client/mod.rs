//! LLM Client: the single point of entry for all model provider calls.
//!
//! Every backend implements [`LlmProvider`]; the rest of the service only sees
//! `Arc<dyn LlmProvider>` built by [`provider_from_config`].
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;

pub mod gemini;
pub mod ollama;
pub mod prompts;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use prompts::Prompt;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    Malformed(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A backend that turns a prompt into the model's raw reply text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Sends one request to the backend. No retries.
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError>;
}

/// Builds the shared outbound HTTP client. One client is reused for every
/// provider call so connections are pooled.
pub fn build_http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Selects and constructs the provider named by `LLM_PROVIDER`.
///
/// Fails with [`LlmError::Config`] before any network call when the selector is
/// missing or unknown, or when the chosen provider lacks its settings.
pub fn provider_from_config(
    config: &LlmConfig,
    http: Client,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let selector = config
        .provider
        .as_deref()
        .map(|p| p.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match selector.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_config(config, http)?)),
        "ollama" => Ok(Arc::new(OllamaClient::from_config(config, http)?)),
        "" => Err(LlmError::Config(
            "LLM_PROVIDER not set (use 'gemini' or 'ollama')".to_string(),
        )),
        other => Err(LlmError::Config(format!(
            "invalid LLM_PROVIDER '{other}' (use 'gemini' or 'ollama')"
        ))),
    }
}

/// Sends a prepared request and returns the body text of a successful reply.
/// Non-success statuses become [`LlmError::Api`] with the provider's own
/// error message when one can be found in the body.
pub(crate) async fn send(request: RequestBuilder) -> Result<String, LlmError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("LLM provider returned {}: {}", status, body);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: provider_error_message(&body),
        });
    }

    debug!("LLM provider replied with {} bytes", body.len());
    Ok(body)
}

/// Pulls a human-readable message out of an error body.
/// Handles both `{"error": "..."}` and `{"error": {"message": "..."}}`.
fn provider_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        let error = v.get("error")?;
        error
            .as_str()
            .or_else(|| error.get("message").and_then(Value::as_str))
            .map(String::from)
    });
    message.unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub async fn spawn_fake_provider(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}
