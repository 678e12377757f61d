//! Scripted `ChatModel` for tests: replays queued replies and records calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{ChatError, ChatMessage, ChatModel, LlmClient, RetryPolicy};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Result<String, ChatError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_json(values: Vec<serde_json::Value>) -> Self {
        Self::new(values.into_iter().map(|v| Ok(v.to_string())).collect())
    }

    pub fn push(&self, reply: Result<String, ChatError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ChatError::Api {
                    status: 400,
                    message: "scripted replies exhausted".to_string(),
                })
            })
    }
}

/// Gateway over a scripted model with millisecond backoff.
pub fn fast_client(chat: Arc<ScriptedChat>) -> LlmClient {
    LlmClient::new(
        chat,
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        },
    )
}
