//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into one OpenAPI 3.1 document, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lectern API",
        version = "0.1.0",
        description = "Turns lecture documents and topics into flashcards, section summaries, and quiz questions.",
    ),
    tags(
        (name = "Health", description = "Server liveness and model provider status"),
        (name = "Study", description = "Flashcard, summary, and quiz generation"),
    ),
    paths(
        crate::api::health::health,
        crate::api::llm_test::llm_test,
        crate::api::flashcards::flashcards,
        crate::api::slides::slides,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::health::HealthResponse,
        crate::api::llm_test::LlmTestResponse,
        crate::api::flashcards::FlashcardsRequest,
        lectern_study::FlashcardsResponse,
        lectern_study::SlidesResponse,
        lectern_core::FlashcardRecord,
        lectern_core::SummaryRecord,
        lectern_core::QuizRecord,
        lectern_core::QuestionType,
        lectern_core::Difficulty,
        lectern_core::AnalysisKind,
    ))
)]
pub struct ApiDoc;
