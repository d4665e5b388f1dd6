use async_trait::async_trait;
use lectern_core::config::SamplingConfig;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message, Role};

/// A local Ollama server's non-streaming chat endpoint.
pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(client: reqwest::Client, url: String, model: String) -> Self {
        Self { client, url, model }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.url.trim_end_matches('/'))
    }

    fn build_request_body(model: &str, messages: &[Message], sampling: &SamplingConfig) -> serde_json::Value {
        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::System => "system",
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect();

        json!({
            "model": model,
            "messages": api_messages,
            "stream": false,
            "options": {
                "temperature": sampling.temperature,
                "top_p": sampling.top_p,
                "top_k": sampling.top_k,
                "num_predict": sampling.max_output_tokens,
            },
        })
    }

    /// Ollama can answer 200 with an `error` field, e.g. when the model is not pulled.
    fn response_text(resp: &serde_json::Value) -> Result<String, LlmError> {
        if let Some(error) = resp["error"].as_str() {
            return Err(LlmError::ParseError(format!("ollama: {error}")));
        }
        resp["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::ParseError("missing message.content".into()))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, messages: Vec<Message>, sampling: &SamplingConfig) -> Result<String, LlmError> {
        let url = self.endpoint();
        let body = Self::build_request_body(&self.model, &messages, sampling);

        debug!("Ollama request to {} model={}", url, self.model);

        let response = self
            .client
            .post(&url)
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
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_disables_streaming_and_maps_sampling() {
        let messages = vec![
            Message { role: Role::System, content: "You are a tutor.".into() },
            Message::user("Quiz me"),
        ];

        let body = OllamaProvider::build_request_body("llama3.2", &messages, &SamplingConfig::FLASHCARDS);

        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Quiz me");

        let options = &body["options"];
        let temp = options["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 1e-6, "temperature should be ~0.7, got {temp}");
        assert_eq!(options["top_k"], 40);
        assert_eq!(options["num_predict"], 2048);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let provider = OllamaProvider::new(reqwest::Client::new(), "http://localhost:11434/".into(), "m".into());
        assert_eq!(provider.endpoint(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn response_text_reads_message_content() {
        let resp = json!({ "message": { "role": "assistant", "content": "[]" }, "done": true });
        assert_eq!(OllamaProvider::response_text(&resp).unwrap(), "[]");
    }

    #[test]
    fn error_field_is_parse_error() {
        let resp = json!({ "error": "model 'llama3.2' not found" });
        let err = OllamaProvider::response_text(&resp).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
