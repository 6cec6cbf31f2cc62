//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the chat-completion LLM that backs the
//! insight pipeline. It implements the `TextGenerationService` port from the
//! `core` crate against any OpenAI-compatible `/chat/completions` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use whispers_core::{
    error::{CoreResult, InsightError},
    ports::TextGenerationService,
};

use crate::config::GenerationConfig;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` with a single bounded
/// HTTP call per prompt.
#[derive(Clone)]
pub struct ChatCompletionAdapter {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl ChatCompletionAdapter {
    /// Creates a new `ChatCompletionAdapter` whose requests time out after
    /// `config.timeout`.
    pub fn new(config: GenerationConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for ChatCompletionAdapter {
    async fn complete(&self, prompt: &str) -> CoreResult<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut request = self.http.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose());
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightError::GenerationFailed(format!(
                "upstream returned status {}",
                status
            )));
        }

        let envelope: ChatResponse = response.json().await.map_err(|e| {
            InsightError::GenerationFailed(format!("malformed response envelope: {}", e.without_url()))
        })?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                InsightError::GenerationFailed(
                    "response envelope contained no message content".to_string(),
                )
            })?;

        debug!(model = %self.config.model, chars = content.len(), "Received completion");
        Ok(content)
    }
}

impl ChatCompletionAdapter {
    fn transport_error(&self, e: reqwest::Error) -> InsightError {
        if e.is_timeout() {
            InsightError::GenerationFailed(format!(
                "request timed out after {:?}",
                self.config.timeout
            ))
        } else {
            InsightError::GenerationFailed(format!("request failed: {}", e.without_url()))
        }
    }
}
