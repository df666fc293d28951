//! OpenAI-compatible chat-completions client using `reqwest`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CompletionError, TextCompleter};

/// Environment variable holding the service base URL (without `/v1`).
pub const ENV_BASE_URL: &str = "HIVEMIND_LLM_URL";
/// Environment variable holding the bearer token.
pub const ENV_API_KEY: &str = "HIVEMIND_LLM_API_KEY";
/// Environment variable holding the model name.
pub const ENV_MODEL: &str = "HIVEMIND_LLM_MODEL";

const CONNECT_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// ChatConfig
// ---------------------------------------------------------------------------

/// Connection settings for a chat-completions endpoint.
#[derive(Clone)]
pub struct ChatConfig {
    /// Base URL, e.g. `https://api.example.com`. The client appends
    /// `/v1/chat/completions`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Sampling temperature. Prompts benefit from variety, so the
    /// default is fairly high (0.9).
    pub temperature: f32,
}

impl ChatConfig {
    /// Creates a config with the default temperature.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.9,
        }
    }

    /// Reads [`ENV_BASE_URL`], [`ENV_API_KEY`] and [`ENV_MODEL`].
    ///
    /// # Errors
    /// [`CompletionError::Config`] naming the first variable that is
    /// missing or blank.
    pub fn from_env() -> Result<Self, CompletionError> {
        Ok(Self::new(
            require_env(ENV_BASE_URL)?,
            require_env(ENV_API_KEY)?,
            require_env(ENV_MODEL)?,
        ))
    }

    /// Full URL of the chat-completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn require_env(name: &str) -> Result<String, CompletionError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CompletionError::Config(format!("missing {name}"))),
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// ChatCompletionsClient
// ---------------------------------------------------------------------------

/// A [`TextCompleter`] backed by an OpenAI-compatible HTTP API.
///
/// Each `complete` call is one `POST` with a single user message. The
/// first choice's content is returned, trimmed.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl ChatCompletionsClient {
    /// Builds a client for the given endpoint.
    ///
    /// # Errors
    /// [`CompletionError::Http`] if the TLS backend fails to initialize.
    pub fn new(config: ChatConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        tracing::info!(base_url = %config.base_url, model = %config.model, "chat completions client ready");
        Ok(Self { http, config })
    }

    /// Shorthand for `ChatConfig::from_env()` followed by `new`.
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::new(ChatConfig::from_env()?)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

impl TextCompleter for ChatCompletionsClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "chat completion rejected");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        tracing::debug!(chars = content.len(), "chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_endpoint_strips_trailing_slash() {
        let config = ChatConfig::new("https://llm.local/", "k", "m");
        assert_eq!(config.endpoint(), "https://llm.local/v1/chat/completions");
    }

    #[test]
    fn test_chat_config_debug_redacts_api_key() {
        let config = ChatConfig::new("https://llm.local", "sk-secret", "m");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_require_env_missing_variable_is_config_error() {
        let err = require_env("HIVEMIND_TEST_VARIABLE_NEVER_SET").unwrap_err();
        assert!(matches!(err, CompletionError::Config(ref msg)
            if msg.contains("HIVEMIND_TEST_VARIABLE_NEVER_SET")));
    }

    #[test]
    fn test_chat_config_default_temperature() {
        let config = ChatConfig::new("u", "k", "m");
        assert!((config.temperature - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_chat_request_serializes_single_user_message() {
        let request = ChatRequest {
            model: "tiny",
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.5,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "tiny");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }
}
