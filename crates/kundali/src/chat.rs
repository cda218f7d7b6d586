//! Conversational collaborator: request shape and the chart-aware chatbot.
//!
//! The chart summary is handed to the backend verbatim inside the system
//! message; the user's question follows as a single user message.

use async_trait::async_trait;
use kundali_config::ChatSettings;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ChatError, KundaliError};

pub const SYSTEM_PREAMBLE: &str = "You are an astrological chatbot. Utilize the following Kundali report to provide accurate and personalized predictions based on the user's queries. \
Provide detailed life predictions categorized into sections such as Personality, Career, Relationships, Health, and Spirituality. \
Use bullet points for clarity and ensure each section is comprehensive, regardless of how the user phrases their question.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Chat-completion request in the shape OpenAI-compatible backends accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

pub fn system_prompt(summary: &str) -> String {
    format!("{}\n\n{}", SYSTEM_PREAMBLE, summary)
}

pub fn build_chat_request(summary: &str, question: &str, settings: &ChatSettings) -> ChatRequest {
    ChatRequest {
        model: settings.model.clone(),
        messages: vec![
            ChatMessage {
                role: ChatRole::System,
                content: system_prompt(summary),
            },
            ChatMessage {
                role: ChatRole::User,
                content: question.to_string(),
            },
        ],
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
        top_p: settings.top_p,
        frequency_penalty: settings.frequency_penalty,
        presence_penalty: settings.presence_penalty,
    }
}

pub struct Chatbot {
    backend: Arc<dyn ChatBackend>,
    settings: ChatSettings,
}

impl Chatbot {
    pub fn new(backend: Arc<dyn ChatBackend>, settings: ChatSettings) -> Self {
        Self { backend, settings }
    }

    /// Ask one question against a report summary.
    pub async fn ask(&self, summary: &str, question: &str) -> Result<String, KundaliError> {
        let request = build_chat_request(summary, question, &self.settings);
        let timeout = self.settings.timeout();

        let answer = match tokio::time::timeout(timeout, self.backend.complete(&request)).await {
            Ok(result) => result?,
            Err(_) => {
                log::warn!("chat backend timed out after {:?}", timeout);
                return Err(KundaliError::Timeout {
                    collaborator: "chat backend",
                    after: timeout,
                });
            }
        };

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ChatError::EmptyResponse.into());
        }
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_carries_summary_verbatim() {
        let summary = "Kundali Report Summary:\nAscendant (Lagna): Leo (130.00°)\n";
        let request = build_chat_request(summary, "What about my career?", &ChatSettings::default());

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert!(request.messages[0].content.starts_with(SYSTEM_PREAMBLE));
        assert!(request.messages[0].content.ends_with(summary));
        assert_eq!(request.messages[1].role, ChatRole::User);
        assert_eq!(request.messages[1].content, "What about my career?");
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.max_tokens, 2400);
    }

    #[test]
    fn test_request_serializes_lowercase_roles() {
        let request = build_chat_request("s", "q", &ChatSettings::default());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 2400);
    }

    struct StalledBackend;

    #[async_trait]
    impl ChatBackend for StalledBackend {
        async fn complete(&self, _request: &ChatRequest) -> Result<String, ChatError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_backend_times_out() {
        let settings = ChatSettings { timeout_secs: 5, ..ChatSettings::default() };
        let chatbot = Chatbot::new(Arc::new(StalledBackend), settings);

        match chatbot.ask("summary", "question").await {
            Err(KundaliError::Timeout { collaborator, after }) => {
                assert_eq!(collaborator, "chat backend");
                assert_eq!(after, Duration::from_secs(5));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
