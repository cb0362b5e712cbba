use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::prompt;

/// Fixed decoding parameters for the audit call. Low temperature plus a
/// pinned seed keeps replies as reproducible as the service allows.
pub const CHAT_MODEL: &str = "gpt-4o";
pub const CHAT_TEMPERATURE: f64 = 0.1;
pub const CHAT_MAX_TOKENS: u32 = 2000;
pub const CHAT_SEED: u64 = 42;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Server-side default credential; per-session keys take precedence.
    pub api_key: Option<String>,
}

impl ChatClientConfig {
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("MODEL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = std::env::var("MODEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let api_key = std::env::var("MODEL_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        Self {
            base_url,
            timeout_secs,
            api_key,
        }
    }
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("model service rejected the API key (401)")]
    Unauthorized,

    #[error("model service rate limit exceeded (429)")]
    RateLimited,

    #[error("network error: {0}")]
    NetworkBlocked(String),

    #[error("network error: request timeout")]
    Timeout,

    #[error("model service returned an error: HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("could not reach model service: {0}")]
    Transport(String),

    #[error("model reply contained no completion choices")]
    EmptyCompletion,
}

impl From<reqwest::Error> for ChatClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatClientError::Timeout
        } else if err.is_connect() {
            ChatClientError::NetworkBlocked(err.to_string())
        } else {
            ChatClientError::Transport(err.to_string())
        }
    }
}

/// Capability seam for the remote chat-completion call so the engine can be
/// exercised without network access.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Issues a single completion request and returns the raw reply text.
    /// No retries: every failure maps to one [`ChatClientError`] subtype.
    async fn complete(
        &self,
        api_key: &str,
        system_prompt: &str,
        policy_text: &str,
    ) -> Result<String, ChatClientError>;
}

#[async_trait]
impl ChatCompletion for Box<dyn ChatCompletion> {
    async fn complete(
        &self,
        api_key: &str,
        system_prompt: &str,
        policy_text: &str,
    ) -> Result<String, ChatClientError> {
        (**self).complete(api_key, system_prompt, policy_text).await
    }
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: ChatClientConfig,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: point the client at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(
        &self,
        api_key: &str,
        system_prompt: &str,
        policy_text: &str,
    ) -> Result<String, ChatClientError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt::build_user_message(policy_text),
                },
            ],
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
            seed: CHAT_SEED,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED => ChatClientError::Unauthorized,
                StatusCode::TOO_MANY_REQUESTS => ChatClientError::RateLimited,
                _ => {
                    let message = match response.json::<ApiErrorBody>().await {
                        Ok(body) => body.error.map(|e| e.message),
                        Err(_) => None,
                    }
                    .unwrap_or_else(|| {
                        status
                            .canonical_reason()
                            .unwrap_or("unknown error")
                            .to_string()
                    });
                    ChatClientError::Http { status, message }
                }
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatClientError::EmptyCompletion)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    seed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
