use async_trait::async_trait;
use lectern_core::config::SamplingConfig;
use serde::{Deserialize, Serialize};

/// A chat message for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Trait for LLM providers; each backend implements this.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a completion request and return the model's response text.
    async fn complete(&self, messages: Vec<Message>, sampling: &SamplingConfig) -> Result<String, LlmError>;

    fn provider_name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Scripted provider for exercising the pipeline without network calls.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A provider that replays queued responses in order and records every prompt it saw.
    pub struct MockLlmProvider {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: Mutex<Vec<(String, SamplingConfig)>>,
    }

    impl MockLlmProvider {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Queue a text response for the next call.
        pub fn queue_text(&self, text: &str) {
            self.responses.lock().unwrap().push_back(Ok(text.to_string()));
        }

        /// Queue a failure for the next call.
        pub fn queue_error(&self, error: LlmError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        /// Prompts received so far, with the sampling settings each was sent with.
        pub fn calls(&self) -> Vec<(String, SamplingConfig)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Default for MockLlmProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn complete(&self, messages: Vec<Message>, sampling: &SamplingConfig) -> Result<String, LlmError> {
            let prompt = messages
                .into_iter()
                .map(|m| m.content)
                .collect::<Vec<_>>()
                .join("\n\n");
            self.calls.lock().unwrap().push((prompt, *sampling));

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(LlmError::ApiError {
                        status: 503,
                        body: "no mock response queued".into(),
                    })
                })
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }
}
