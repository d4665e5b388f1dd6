use std::sync::Arc;
use std::time::Instant;

use lectern_core::config::{LlmConfig, OllamaConfig, SamplingConfig};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::create_provider;

#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("model call failed: {0}")]
    Provider(LlmError),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("model provider not configured: {0}")]
    NotConfigured(String),
}

impl From<LlmError> for GenerationFailure {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::NotConfigured(reason) => GenerationFailure::NotConfigured(reason),
            other => GenerationFailure::Provider(other),
        }
    }
}

/// Sends prompts to the configured model. One call per prompt, no retries.
#[derive(Clone)]
pub struct GenerationInvoker {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn LlmProvider>),
    Unavailable(String),
}

impl GenerationInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            backend: Backend::Ready(provider),
        }
    }

    /// An invoker whose every call fails with `NotConfigured`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unavailable(reason.into()),
        }
    }

    /// Build from config. A provider that cannot be created leaves the
    /// invoker unavailable instead of failing startup.
    pub fn from_config(llm_config: &LlmConfig, ollama_config: &OllamaConfig) -> Self {
        match create_provider(llm_config, ollama_config) {
            Ok(provider) => Self::new(provider),
            Err(e) => {
                warn!(provider = %llm_config.provider, error = %e, "LLM provider unavailable; responses will use fallback content");
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    pub fn provider_name(&self) -> &str {
        match &self.backend {
            Backend::Ready(provider) => provider.provider_name(),
            Backend::Unavailable(_) => "none",
        }
    }

    /// Send one prompt and return the raw response text.
    pub async fn invoke(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, GenerationFailure> {
        let provider = match &self.backend {
            Backend::Ready(provider) => provider,
            Backend::Unavailable(reason) => return Err(GenerationFailure::NotConfigured(reason.clone())),
        };

        let started = Instant::now();
        let text = provider.complete(vec![Message::user(prompt)], sampling).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if text.trim().is_empty() {
            warn!(provider = provider.provider_name(), elapsed_ms, "Model returned an empty response");
            return Err(GenerationFailure::EmptyResponse);
        }

        info!(
            provider = provider.provider_name(),
            prompt_chars = prompt.len(),
            response_chars = text.len(),
            elapsed_ms,
            "Model call completed"
        );
        debug!(response = %text, "Raw model response");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockLlmProvider;

    #[tokio::test]
    async fn returns_raw_text_and_forwards_sampling() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text("[]");
        let invoker = GenerationInvoker::new(mock.clone());

        let text = invoker.invoke("prompt", &SamplingConfig::DOCUMENT).await.unwrap();
        assert_eq!(text, "[]");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "prompt");
        assert_eq!(calls[0].1, SamplingConfig::DOCUMENT);
    }

    #[tokio::test]
    async fn blank_response_is_a_failure() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text("  \n");
        let invoker = GenerationInvoker::new(mock);
        assert!(matches!(
            invoker.invoke("prompt", &SamplingConfig::FLASHCARDS).await,
            Err(GenerationFailure::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn provider_errors_are_not_retried() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_error(LlmError::ApiError { status: 500, body: "boom".into() });
        mock.queue_text("never reached");
        let invoker = GenerationInvoker::new(mock.clone());

        let err = invoker.invoke("prompt", &SamplingConfig::DOCUMENT).await.unwrap_err();
        assert!(matches!(err, GenerationFailure::Provider(LlmError::ApiError { status: 500, .. })));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn unavailable_invoker_reports_not_configured() {
        let invoker = GenerationInvoker::unavailable("GOOGLE_GEMINI_API_KEY not set");
        assert!(!invoker.is_configured());
        assert_eq!(invoker.provider_name(), "none");
        assert!(matches!(
            invoker.invoke("prompt", &SamplingConfig::DOCUMENT).await,
            Err(GenerationFailure::NotConfigured(reason)) if reason.contains("GOOGLE_GEMINI_API_KEY")
        ));
    }
}
