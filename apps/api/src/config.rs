use anyhow::{bail, Context, Result};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables.
///
/// Provider settings are optional here: a missing or unknown provider is
/// reported per request by the provider factory, so the health endpoint keeps
/// working while the service is misconfigured.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm: LlmConfig,
    pub cors_origin: String,
}

/// Provider selection and per-provider settings.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// `gemini` or `ollama`.
    pub provider: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: String,
    pub ollama_base_url: Option<String>,
    pub ollama_model: Option<String>,
    /// `generate` or `chat`.
    pub ollama_api: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            llm: LlmConfig {
                provider: get("LLM_PROVIDER"),
                gemini_api_key: get("GEMINI_API_KEY"),
                gemini_model: get("GEMINI_MODEL"),
                gemini_base_url: get("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                ollama_base_url: get("OLLAMA_BASE_URL"),
                ollama_model: get("OLLAMA_MODEL"),
                ollama_api: get("OLLAMA_API").unwrap_or_else(|| "generate".to_string()),
                timeout_secs: parse_timeout(get("LLM_TIMEOUT_SECS"))?,
            },
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}

/// A zero timeout would fail every provider call immediately.
fn parse_timeout(raw: Option<String>) -> Result<u64> {
    let secs = raw
        .unwrap_or_else(|| "120".to_string())
        .parse::<u64>()
        .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;
    if secs == 0 {
        bail!("LLM_TIMEOUT_SECS must be greater than zero");
    }
    Ok(secs)
}
