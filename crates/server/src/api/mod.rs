//! HTTP endpoint modules.
//!
//! Each sub-module owns one route. Shared error body lives here.

pub mod doc;
mod flashcards;
mod health;
mod llm_test;
mod slides;

use serde::Serialize;
use utoipa::ToSchema;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// ── Re-exports ───────────────────────────────────────────────────

pub use flashcards::flashcards;
pub use health::health;
pub use llm_test::llm_test;
pub use slides::slides;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::response::Response;
    use axum::Router;
    use lectern_core::config::{GenerationConfig, ServerConfig};
    use lectern_llm::provider::mock::MockLlmProvider;
    use lectern_llm::GenerationInvoker;
    use lectern_study::StudyPipeline;

    use crate::router::build_router;
    use crate::state::AppState;

    pub fn server_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origin: "*".into(),
            max_upload_mb: 25,
        }
    }

    /// Router backed by a mock provider; `tweak` adjusts the server config.
    pub fn app_with(tweak: impl FnOnce(&mut ServerConfig)) -> (Router, Arc<MockLlmProvider>) {
        let mock = Arc::new(MockLlmProvider::new());
        let mut server = server_config();
        tweak(&mut server);
        let state = Arc::new(AppState {
            pipeline: StudyPipeline::new(GenerationInvoker::new(mock.clone()), GenerationConfig::default()),
            server,
        });
        (build_router(state), mock)
    }

    pub fn app() -> (Router, Arc<MockLlmProvider>) {
        app_with(|_| {})
    }

    /// Router whose model provider was never configured.
    pub fn unconfigured_app() -> Router {
        let state = Arc::new(AppState {
            pipeline: StudyPipeline::new(
                GenerationInvoker::unavailable("GOOGLE_GEMINI_API_KEY not set"),
                GenerationConfig::default(),
            ),
            server: server_config(),
        });
        build_router(state)
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
