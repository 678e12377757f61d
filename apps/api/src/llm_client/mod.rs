/// LLM Client: the single point of entry for all model calls in the interviewer.
///
/// ARCHITECTURAL RULE: No other module may talk to a model provider directly.
/// Everything goes through `LlmClient`, which owns the structured-call protocol:
/// JSON extraction, the one-shot repair call, failure classification and
/// exponential backoff.
///
/// The provider itself sits behind the `ChatModel` trait so the flow and the
/// assessors never depend on a specific SDK.
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod extract;
pub mod http;
pub mod lenient;
pub mod prompts;
pub mod retry;
#[cfg(test)]
pub mod testing;

pub use http::OpenAiChatClient;
pub use retry::{classify_failure, Backoff, FailureClass, RetryPolicy};

use crate::llm_client::extract::parse_json_object;
use crate::llm_client::prompts::{repair_prompt, JSON_ONLY_SYSTEM};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Errors raised at the model-invocation boundary.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM request timed out")]
    Timeout,

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// The model-invocation capability: one chat completion, text out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, ChatError>;
}

/// Final outcome of a failed structured or text call.
#[derive(Debug, Clone, Error)]
pub enum CallFailure {
    /// Every attempt failed with a transient error.
    #[error("LLM call failed after {attempts} attempts: {message}")]
    Transient { attempts: u32, message: String },

    /// A non-retryable failure (auth, bad request, unrecoverable JSON).
    #[error("LLM call failed: {message}")]
    Fatal { message: String },
}

impl CallFailure {
    pub fn is_transient(&self) -> bool {
        matches!(self, CallFailure::Transient { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            CallFailure::Transient { message, .. } | CallFailure::Fatal { message } => message,
        }
    }
}

/// Failure of a single attempt inside `call_structured`.
#[derive(Debug, Error)]
enum AttemptError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("JSON extraction failed: {0}")]
    Extraction(String),
}

impl AttemptError {
    fn class(&self) -> FailureClass {
        match self {
            AttemptError::Chat(e) => classify_failure(e),
            AttemptError::Extraction(_) => FailureClass::Fatal,
        }
    }
}

/// The single model gateway shared by the flow and the assessors.
#[derive(Clone)]
pub struct LlmClient {
    chat: Arc<dyn ChatModel>,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(chat: Arc<dyn ChatModel>, retry: RetryPolicy) -> Self {
        Self { chat, retry }
    }

    /// Calls the model and returns the JSON object embedded in its reply.
    ///
    /// Transient failures are retried with exponential backoff up to
    /// `max_attempts` total attempts; fatal failures return immediately.
    /// A reply that does not parse gets exactly one repair call at
    /// temperature 0 before the attempt is declared fatal.
    pub async fn call_structured(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_attempts: u32,
        temperature: f32,
    ) -> Result<Value, CallFailure> {
        let mut backoff = Backoff::new(&self.retry, max_attempts);

        loop {
            let err = match self.attempt_structured(model, messages, temperature).await {
                Ok(value) => {
                    debug!(
                        "Structured call to {model} succeeded on attempt {}",
                        backoff.attempt()
                    );
                    return Ok(value);
                }
                Err(err) => err,
            };

            let message = err.to_string();
            if err.class() == FailureClass::Fatal {
                warn!("Structured call to {model} failed fatally: {message}");
                return Err(CallFailure::Fatal { message });
            }

            match backoff.advance() {
                Some(delay) => {
                    warn!(
                        "LLM call attempt {} to {model} failed ({message}), retrying after {}ms...",
                        backoff.attempt() - 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(CallFailure::Transient {
                        attempts: backoff.attempt(),
                        message,
                    })
                }
            }
        }
    }

    /// `call_structured` followed by deserialization into a boundary type.
    /// The boundary types are all-optional, so a mismatch here means the
    /// model returned the wrong JSON types outright.
    pub async fn call_structured_as<T: DeserializeOwned>(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<T, CallFailure> {
        let value = self
            .call_structured(model, messages, self.retry.max_attempts, temperature)
            .await?;
        serde_json::from_value(value).map_err(|e| CallFailure::Fatal {
            message: format!("Response JSON did not match the expected shape: {e}"),
        })
    }

    /// Single best-effort call for free text. No retry, no JSON handling.
    pub async fn call_text(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, CallFailure> {
        let text = self
            .chat
            .chat(model, messages, temperature)
            .await
            .map_err(|e| into_single_failure(&e))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(into_single_failure(&ChatError::EmptyContent));
        }
        Ok(text.to_string())
    }

    async fn attempt_structured(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<Value, AttemptError> {
        let content = self.chat.chat(model, messages, temperature).await?;
        if content.trim().is_empty() {
            return Err(ChatError::EmptyContent.into());
        }

        match parse_json_object(&content) {
            Ok(value) => Ok(value),
            Err(reason) => {
                warn!("Could not parse JSON from {model} ({reason}); issuing repair call");
                self.repair(model, &content).await
            }
        }
    }

    async fn repair(&self, model: &str, content: &str) -> Result<Value, AttemptError> {
        let messages = [
            ChatMessage::system(JSON_ONLY_SYSTEM),
            ChatMessage::user(repair_prompt(content)),
        ];
        let repaired = self.chat.chat(model, &messages, 0.0).await?;
        parse_json_object(&repaired).map_err(AttemptError::Extraction)
    }
}

fn into_single_failure(err: &ChatError) -> CallFailure {
    let message = err.to_string();
    match classify_failure(err) {
        FailureClass::Transient => CallFailure::Transient {
            attempts: 1,
            message,
        },
        FailureClass::Fatal => CallFailure::Fatal { message },
    }
}
