//! Topic-driven flashcard generation.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lectern_core::{FlashcardRecord, RequestError};
use lectern_study::FlashcardsResponse;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardsRequest {
    #[serde(default)]
    pub topic: Option<String>,
    /// Card count; a number or numeric string. Clamped to the configured maximum.
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub num_cards: Option<Value>,
}

impl FlashcardsRequest {
    fn topic(&self) -> Option<&str> {
        self.topic.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    fn num_cards(&self) -> Option<usize> {
        match self.num_cards.as_ref()? {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Generate flashcards
///
/// Model failures never surface as errors: the response carries fallback
/// cards and an `error` string instead. Only a missing topic or an
/// unreadable body is a 400.
#[utoipa::path(
    post,
    path = "/api/flashcards",
    tag = "Study",
    request_body = FlashcardsRequest,
    responses(
        (status = 200, description = "Generated or fallback flashcards", body = FlashcardsResponse),
        (status = 400, description = "Missing topic or malformed body", body = FlashcardsResponse)
    )
)]
pub async fn flashcards(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardsRequest>, JsonRejection>,
) -> Result<Json<FlashcardsResponse>, (StatusCode, Json<FlashcardsResponse>)> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected flashcards request body");
        bad_request(RequestError::MalformedBody(e.body_text()))
    })?;
    let topic = request.topic().ok_or_else(|| bad_request(RequestError::MissingTopic))?;

    let count = state.pipeline.generation().flashcard_count(request.num_cards());
    info!(topic, count, "Flashcards requested");
    Ok(Json(state.pipeline.flashcards(topic, count).await))
}

fn bad_request(error: RequestError) -> (StatusCode, Json<FlashcardsResponse>) {
    let guidance = match error {
        RequestError::MissingTopic => {
            FlashcardRecord::new("Missing topic", "Please provide a topic to generate flashcards.")
        }
        _ => FlashcardRecord::new(
            "Invalid request",
            "Send a JSON body such as {\"topic\": \"Cell biology\", \"numCards\": 5}.",
        ),
    };
    (
        StatusCode::BAD_REQUEST,
        Json(FlashcardsResponse {
            flashcards: vec![guidance],
            error: Some(error.to_string()),
        }),
    )
}
