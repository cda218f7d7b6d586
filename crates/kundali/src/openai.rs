//! OpenAI-compatible chat completions over HTTP.

use async_trait::async_trait;
use kundali_config::ChatSettings;
use serde::Deserialize;

use crate::chat::{ChatBackend, ChatRequest};
use crate::error::{ChatError, KundaliError};

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    fn into_answer(self) -> Result<String, ChatError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatError::EmptyResponse)
    }
}

/// [`ChatBackend`] for any server speaking the `/v1/chat/completions` protocol.
pub struct OpenAiChatBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiChatBackend {
    pub fn new(settings: &ChatSettings) -> Result<Self, KundaliError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| KundaliError::Configuration(format!("chat HTTP client: {}", e)))?;
        Self::with_client(client, settings)
    }

    pub fn with_client(client: reqwest::Client, settings: &ChatSettings) -> Result<Self, KundaliError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| KundaliError::Configuration("chat.api_key is not set".to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        log::info!("chat completion [{}] with {} messages", request.model, request.messages.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Rejected(format!("HTTP {}: {}", status, body.trim())));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Malformed(e.to_string()))?;

        body.into_answer()
    }
}
