//! Local provider: an Ollama server reached over plain HTTP.

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::llm_client::{send, LlmError, LlmProvider, Prompt};

/// Which Ollama endpoint to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OllamaApi {
    /// `POST /api/generate` with the rendered prompt.
    #[default]
    Generate,
    /// `POST /api/chat` with system and user messages.
    Chat,
}

impl FromStr for OllamaApi {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generate" => Ok(OllamaApi::Generate),
            "chat" => Ok(OllamaApi::Chat),
            other => Err(LlmError::Config(format!(
                "invalid OLLAMA_API '{other}' (use 'generate' or 'chat')"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    api: OllamaApi,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: String, model: String, api: OllamaApi) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api,
        }
    }

    pub fn from_config(config: &LlmConfig, client: Client) -> Result<Self, LlmError> {
        let (Some(base_url), Some(model)) = (&config.ollama_base_url, &config.ollama_model) else {
            return Err(LlmError::Config(
                "OLLAMA_BASE_URL or OLLAMA_MODEL not set".to_string(),
            ));
        };
        let api = config.ollama_api.parse::<OllamaApi>()?;
        Ok(Self::new(client, base_url.clone(), model.clone(), api))
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let rendered = prompt.render();
        let request_body = GenerateRequest {
            model: &self.model,
            prompt: &rendered,
            stream: false,
        };

        let body = send(
            self.client
                .post(format!("{}/api/generate", self.base_url))
                .json(&request_body),
        )
        .await?;

        let response: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;
        Ok(response.response)
    }

    async fn chat(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            stream: false,
        };

        let body = send(
            self.client
                .post(format!("{}/api/chat", self.base_url))
                .json(&request_body),
        )
        .await?;

        let response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;
        Ok(response.message.content)
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        match self.api {
            OllamaApi::Generate => self.complete(prompt).await,
            OllamaApi::Chat => self.chat(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::llm_client::{build_http_client, test_support::spawn_fake_provider};

    type Captured = Arc<Mutex<Option<Value>>>;

    async fn fake_ollama(path: &str, reply: Value) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route(
                path,
                post(
                    |State((captured, reply)): State<(Captured, Value)>,
                     Json(body): Json<Value>| async move {
                        *captured.lock().unwrap() = Some(body);
                        Json(reply)
                    },
                ),
            )
            .with_state((captured.clone(), reply));
        (spawn_fake_provider(router).await, captured)
    }

    fn client(base_url: String, api: OllamaApi) -> OllamaClient {
        OllamaClient::new(
            build_http_client(5).unwrap(),
            base_url,
            "llama3".to_string(),
            api,
        )
    }

    #[tokio::test]
    async fn test_generate_api_sends_rendered_prompt() {
        let (base_url, captured) =
            fake_ollama("/api/generate", json!({"model": "llama3", "response": "{}", "done": true}))
                .await;

        let prompt = Prompt::new("Instruction", "Resume:\nGo");
        let reply = client(base_url, OllamaApi::Generate)
            .generate(&prompt)
            .await
            .unwrap();

        assert_eq!(reply, "{}");
        let body = captured.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["prompt"], "Instruction\n\nResume:\nGo");
        assert_eq!(body["stream"], false);
    }

    #[tokio::test]
    async fn test_chat_api_sends_system_and_user_messages() {
        let (base_url, captured) = fake_ollama(
            "/api/chat",
            json!({"model": "llama3", "message": {"role": "assistant", "content": "hello"}, "done": true}),
        )
        .await;

        let prompt = Prompt::new("Instruction", "Resume:\nGo");
        let reply = client(format!("{base_url}/"), OllamaApi::Chat)
            .generate(&prompt)
            .await
            .unwrap();

        assert_eq!(reply, "hello");
        let body = captured.lock().unwrap().clone().unwrap();
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Instruction");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Resume:\nGo");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let (base_url, _) = fake_ollama("/api/generate", json!({"unexpected": true})).await;
        let err = client(base_url, OllamaApi::Generate)
            .generate(&Prompt::new("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_not_found_model_is_api_error() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": "model 'llama3' not found"})),
                )
            }),
        );
        let base_url = spawn_fake_provider(router).await;

        let err = client(base_url, OllamaApi::Generate)
            .generate(&Prompt::new("a", "b"))
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "model 'llama3' not found");
            }
            other => panic!("expected API error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}"), OllamaApi::Generate)
            .generate(&Prompt::new("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }

    #[test]
    fn test_api_mode_parsing() {
        assert_eq!("generate".parse::<OllamaApi>().unwrap(), OllamaApi::Generate);
        assert_eq!(" CHAT ".parse::<OllamaApi>().unwrap(), OllamaApi::Chat);
        assert!(matches!(
            "stream".parse::<OllamaApi>(),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let config = LlmConfig {
            ollama_model: Some("llama3".to_string()),
            ollama_api: "generate".to_string(),
            ..LlmConfig::default()
        };
        let result = OllamaClient::from_config(&config, build_http_client(5).unwrap());
        assert!(matches!(result, Err(LlmError::Config(_))));
    }
}
