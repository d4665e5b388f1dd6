//! Connectivity check for the configured model provider.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use lectern_llm::GenerationFailure;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::state::AppState;

const CHECK_PROMPT: &str = "Reply with 'API is working!' if you receive this message.";

#[derive(Debug, Serialize, ToSchema)]
pub struct LlmTestResponse {
    /// `ok`, `error`, or `unconfigured`.
    pub status: String,
    pub provider: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Send a fixed prompt to the model provider
///
/// Sends a fixed one-line prompt. Provider failures are reported in the
/// body with status 200.
#[utoipa::path(
    get,
    path = "/api/llm/test",
    tag = "Health",
    responses(
        (status = 200, description = "Connectivity result", body = LlmTestResponse)
    )
)]
pub async fn llm_test(State(state): State<Arc<AppState>>) -> Json<LlmTestResponse> {
    let invoker = state.pipeline.invoker();
    let provider = invoker.provider_name().to_string();
    let sampling = state.pipeline.generation().flashcards;

    let (status, message, response) = match invoker.invoke(CHECK_PROMPT, &sampling).await {
        Ok(text) => {
            info!(provider = %provider, "Model connectivity check succeeded");
            ("ok", format!("{} is responding", provider), Some(text))
        }
        Err(GenerationFailure::NotConfigured(reason)) => ("unconfigured", reason, None),
        Err(e) => {
            warn!(provider = %provider, error = %e, "Model connectivity check failed");
            ("error", e.to_string(), None)
        }
    };

    Json(LlmTestResponse {
        status: status.to_string(),
        provider,
        message,
        response,
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use lectern_llm::LlmError;
    use tower::ServiceExt;

    use super::CHECK_PROMPT;
    use crate::api::test_support::{app, body_json, unconfigured_app};

    fn check_request() -> Request<Body> {
        Request::builder().uri("/api/llm/test").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn reports_model_reply() {
        let (app, mock) = app();
        mock.queue_text("API is working!");

        let response = app.oneshot(check_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "mock");
        assert_eq!(body["response"], "API is working!");
        assert_eq!(mock.calls()[0].0, CHECK_PROMPT);
    }

    #[tokio::test]
    async fn provider_error_is_not_a_server_error() {
        let (app, mock) = app();
        mock.queue_error(LlmError::ApiError {
            status: 401,
            body: "invalid key".into(),
        });

        let response = app.oneshot(check_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("401"));
        assert!(body.get("response").is_none());
    }

    #[tokio::test]
    async fn unconfigured_provider_is_reported() {
        let response = unconfigured_app().oneshot(check_request()).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "unconfigured");
        assert_eq!(body["provider"], "none");
        assert!(body["message"].as_str().unwrap().contains("GOOGLE_GEMINI_API_KEY"));
    }
}
