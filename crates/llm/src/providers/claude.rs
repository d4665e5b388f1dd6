use async_trait::async_trait;
use lectern_core::config::SamplingConfig;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message, Role};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self { client, api_key, model }
    }

    /// System prompts go in the top-level `system` field, not the message list.
    fn build_request_body(model: &str, messages: &[Message], sampling: &SamplingConfig) -> serde_json::Value {
        let system = messages
            .iter()
            .filter(|m| matches!(m.role, Role::System))
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .filter(|m| !matches!(m.role, Role::System))
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::Assistant => "assistant",
                        _ => "user",
                    },
                    "content": m.content,
                })
            })
            .collect();

        let mut body = json!({
            "model": model,
            "messages": api_messages,
            "temperature": sampling.temperature,
            "top_p": sampling.top_p,
            "top_k": sampling.top_k,
            "max_tokens": sampling.max_output_tokens,
        });

        if !system.is_empty() {
            body["system"] = json!(system);
        }

        body
    }

    /// Join every text block; tool and thinking blocks are skipped.
    fn response_text(resp: &serde_json::Value) -> Result<String, LlmError> {
        let blocks = resp["content"]
            .as_array()
            .ok_or_else(|| LlmError::ParseError("missing content blocks".into()))?;

        let text: Vec<&str> = blocks
            .iter()
            .filter(|b| b["type"] == "text")
            .filter_map(|b| b["text"].as_str())
            .collect();

        if text.is_empty() {
            return Err(LlmError::ParseError("no text block in response".into()));
        }
        Ok(text.join(""))
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn complete(&self, messages: Vec<Message>, sampling: &SamplingConfig) -> Result<String, LlmError> {
        let body = Self::build_request_body(&self.model, &messages, sampling);

        debug!("Anthropic request model={}", self.model);

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        Self::response_text(&resp)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}
