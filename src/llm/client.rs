//! DeepSeek chat-completions client.
//!
//! Thin, non-streaming adapter over the OpenAI-compatible
//! `POST {base_url}/chat/completions` endpoint. One request per answer;
//! no retries — a failed call falls back to the extractive summary.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::BlasterError;

/// Configuration for the DeepSeek adapter.
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    /// API key for bearer authentication.
    pub api_key: String,
    /// Base URL (defaults to `https://api.deepseek.com`).
    pub base_url: String,
    /// The model to use.
    pub model: String,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl DeepSeekConfig {
    /// Create a new config with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.deepseek.com".into(),
            model: "deepseek-chat".into(),
            max_tokens: 1024,
            temperature: 0.3,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author (`system`, `user`, `assistant`).
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Build a `system` message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    /// Build a `user` message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    max_tokens: u32,
    temperature: f64,
}

/// Chat completion response body (the fields we read).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Error payload shape returned by the API on non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Non-streaming DeepSeek chat-completions client.
pub struct DeepSeekClient {
    config: DeepSeekConfig,
    client: reqwest::Client,
}

impl DeepSeekClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`BlasterError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: DeepSeekConfig) -> Result<Self, BlasterError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| BlasterError::Llm(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a conversation and return the assistant's reply text.
    ///
    /// # Errors
    ///
    /// Returns [`BlasterError::Llm`] on transport failure, a non-2xx
    /// status, or an empty completion.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, BlasterError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            stream: false,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::trace!(model = %self.config.model, messages = messages.len(), "chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BlasterError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(BlasterError::Llm(format!(
                "API returned {status}: {detail}"
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BlasterError::Llm(format!("response JSON invalid: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(BlasterError::Llm("empty completion".into()));
        }

        tracing::debug!(chars = content.len(), "chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = DeepSeekConfig::new("sk-test");
        assert_eq!(config.base_url, "https://api.deepseek.com");
        assert_eq!(config.model, "deepseek-chat");
    }

    #[test]
    fn config_builders() {
        let config = DeepSeekConfig::new("sk-test")
            .with_base_url("http://localhost:9999")
            .with_model("deepseek-reasoner");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.model, "deepseek-reasoner");
    }

    #[test]
    fn message_constructors() {
        let sys = ChatMessage::system("be brief");
        let user = ChatMessage::user("hello");
        assert_eq!(sys.role, "system");
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "hello");
    }

    #[test]
    fn request_serialises_expected_shape() {
        let messages = vec![ChatMessage::user("hi")];
        let body = ChatCompletionRequest {
            model: "deepseek-chat",
            messages: &messages,
            stream: false,
            max_tokens: 64,
            temperature: 0.3,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_parses_first_choice() {
        let raw = r#"{
            "id": "cmpl-1", "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Answer [1]."}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.choices[0].message.content, "Answer [1].");
    }
}
