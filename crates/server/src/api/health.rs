//! Liveness and model-configuration status.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub llm_configured: bool,
}

/// Server health
///
/// Always 200 while the process is up; `llmConfigured` tells whether
/// generation will reach a model or go straight to fallback content.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let invoker = state.pipeline.invoker();
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        provider: invoker.provider_name().to_string(),
        llm_configured: invoker.is_configured(),
    })
}
