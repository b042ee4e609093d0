//! Text-generation client — the summarization capability seam
//!
//! Two implementations:
//! - `HttpGenerator`: OpenAI-compatible chat-completions endpoint (production)
//! - `MockGenerator`: preconfigured responses with a call counter (testing)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Errors from text-generation operations.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("prompt encoding failed: {0}")]
    Prompt(#[from] serde_json::Error),
    #[error("generation request failed: {0}")]
    Request(String),
    #[error("generation response malformed: {0}")]
    Response(String),
}

/// Client trait for the external text-generation service.
///
/// Abstracts over transport so the summary consumer doesn't depend on how
/// the service is reached.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce text for a system-context / user-prompt pair.
    async fn generate(&self, system_context: &str, user_prompt: &str)
        -> Result<String, GenerateError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Generator backed by an OpenAI-compatible chat-completions endpoint.
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpGenerator {
    /// `endpoint` is the API base, e.g. `http://localhost:11434/v1`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(
        &self,
        system_context: &str,
        user_prompt: &str,
    ) -> Result<String, GenerateError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_context,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerateError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| GenerateError::Request(e.to_string()))?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Response(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GenerateError::Response("no choices in response".to_string()))
    }
}

/// Mock generator for testing — returns a preconfigured response and
/// counts how often it was invoked.
pub struct MockGenerator {
    response: Option<String>,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Mock that answers every call with `response`.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many generation calls were made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        _system_context: &str,
        _user_prompt: &str,
    ) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(GenerateError::Request(
                "mock generator configured to fail".to_string(),
            )),
        }
    }
}
