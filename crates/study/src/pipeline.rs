//! End-to-end orchestration: extract, classify, prompt, invoke, validate,
//! normalize, and fall back when any stage fails.

use lectern_core::config::{GenerationConfig, SamplingConfig};
use lectern_core::{
    AnalysisKind, DomainHint, ExtractedContent, FlashcardRecord, GeneratedRecords, GenerationTask, QuizRecord,
    RawDocument, SummaryRecord,
};
use lectern_ingest::{classify, extract};
use lectern_llm::parse::{segment_notes, ParseFailure};
use lectern_llm::{parse_and_validate, prompt, GenerationFailure, GenerationInvoker};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::fallback::fallback;
use crate::normalize::normalize;

// ── Response types ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<FlashcardRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlidesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Vec<SummaryRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_questions: Option<Vec<QuizRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub summaries: Vec<SummaryRecord>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub quiz_questions: Vec<QuizRecord>,
    pub warnings: Vec<String>,
}

/// Why a task ended up on fallback content.
#[derive(Debug, Error)]
enum StageFailure {
    #[error(transparent)]
    Generation(#[from] GenerationFailure),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

// ── Pipeline ──────────────────────────────────────────────────

/// Stateless study-material generator. Cheap to share behind an `Arc`.
pub struct StudyPipeline {
    invoker: GenerationInvoker,
    generation: GenerationConfig,
}

impl StudyPipeline {
    pub fn new(invoker: GenerationInvoker, generation: GenerationConfig) -> Self {
        Self { invoker, generation }
    }

    pub fn invoker(&self) -> &GenerationInvoker {
        &self.invoker
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Generate flashcards for a bare topic.
    pub async fn flashcards(&self, topic: &str, count: usize) -> FlashcardsResponse {
        let domain = classify(topic, "");
        let task = GenerationTask::Flashcards {
            topic: topic.trim().to_string(),
            count,
        };

        match self.generate(&task, &domain, &self.generation.flashcards).await {
            Ok(GeneratedRecords::Flashcards(flashcards)) => {
                info!(task = "flashcards", records = flashcards.len(), domain = %domain, "Generated flashcards");
                FlashcardsResponse { flashcards, error: None }
            }
            other => {
                let reason = failure_reason(other);
                warn!(task = "flashcards", error = %reason, domain = %domain, "Using fallback flashcards");
                FlashcardsResponse {
                    flashcards: fallback(&task, &domain).into_flashcards().unwrap_or_default(),
                    error: Some(format!("Generation error: {}", reason)),
                }
            }
        }
    }

    /// Summarize extracted content into titled sections.
    pub async fn summarize(&self, content: &ExtractedContent, domain: &DomainHint) -> SummaryOutcome {
        let task = GenerationTask::Summary {
            content: content.clone(),
        };

        let failure = match self.generate(&task, domain, &self.generation.summary).await {
            Ok(GeneratedRecords::Summaries(summaries)) => {
                info!(task = "summary", records = summaries.len(), domain = %domain, "Generated summaries");
                return SummaryOutcome {
                    summaries,
                    warnings: Vec::new(),
                };
            }
            Err((StageFailure::Parse(ParseFailure::NoJsonArray), Some(raw))) => {
                let failure = StageFailure::Parse(ParseFailure::NoJsonArray).to_string();
                let summaries = segment_notes(&raw);
                if !summaries.is_empty() {
                    warn!(task = "summary", records = summaries.len(), "Segmented prose notes into sections");
                    return SummaryOutcome {
                        summaries,
                        warnings: vec![format!("Summary warning: {}; sections were taken from headed notes", failure)],
                    };
                }
                failure
            }
            other => failure_reason(other),
        };

        warn!(task = "summary", error = %failure, domain = %domain, "Using fallback summaries");
        SummaryOutcome {
            summaries: fallback(&task, domain).into_summaries().unwrap_or_default(),
            warnings: vec![format!("Summary error: {}", failure)],
        }
    }

    /// Write quiz questions for extracted content.
    pub async fn quiz(&self, content: &ExtractedContent, domain: &DomainHint) -> QuizOutcome {
        let task = GenerationTask::Quiz {
            content: content.clone(),
        };

        let (drafts, warnings) = match self.generate(&task, domain, &self.generation.quiz).await {
            Ok(GeneratedRecords::Quiz(drafts)) => {
                info!(task = "quiz", records = drafts.len(), domain = %domain, "Generated quiz questions");
                (drafts, Vec::new())
            }
            other => {
                let reason = failure_reason(other);
                warn!(task = "quiz", error = %reason, domain = %domain, "Using fallback quiz");
                let drafts = fallback(&task, domain).into_quiz().unwrap_or_default();
                (drafts, vec![format!("Quiz error: {}", reason)])
            }
        };

        QuizOutcome {
            quiz_questions: drafts.into_iter().map(normalize).collect(),
            warnings,
        }
    }

    /// Run the document pipeline: extract once, classify once, then each requested task.
    pub async fn analyze(&self, raw: RawDocument, kind: AnalysisKind) -> SlidesResponse {
        let filename = raw.filename.clone();
        let content = match tokio::task::spawn_blocking(move || extract(&raw)).await {
            Ok(content) => content,
            Err(e) => {
                warn!(filename = %filename, error = %e, "Extraction task failed");
                extract(&RawDocument::new(Vec::new(), "", filename.clone()))
            }
        };
        let domain = classify(&content.text, &filename);
        info!(
            filename = %filename,
            content_type = %content.content_type,
            sparse = content.is_sparse,
            domain = %domain,
            kind = ?kind,
            "Analyzing document"
        );

        let summary = async {
            if kind.wants_summary() {
                Some(self.summarize(&content, &domain).await)
            } else {
                None
            }
        };
        let quiz = async {
            if kind.wants_quiz() {
                Some(self.quiz(&content, &domain).await)
            } else {
                None
            }
        };
        let (summary, quiz) = tokio::join!(summary, quiz);

        let mut response = SlidesResponse::default();
        let mut warnings = Vec::new();
        if let Some(outcome) = summary {
            response.summaries = Some(outcome.summaries);
            warnings.extend(outcome.warnings);
        }
        if let Some(outcome) = quiz {
            response.quiz_questions = Some(outcome.quiz_questions);
            warnings.extend(outcome.warnings);
        }
        if !warnings.is_empty() {
            response.warnings = Some(warnings);
        }
        response
    }

    /// Prompt, invoke and validate. On a parse failure the raw text is
    /// handed back so callers can salvage it.
    async fn generate(
        &self,
        task: &GenerationTask,
        domain: &DomainHint,
        sampling: &SamplingConfig,
    ) -> Result<GeneratedRecords, (StageFailure, Option<String>)> {
        let prompt = prompt::build(task, domain);
        let raw = self
            .invoker
            .invoke(&prompt, sampling)
            .await
            .map_err(|e| (StageFailure::from(e), None))?;
        match parse_and_validate(task, &raw) {
            Ok(records) => Ok(records),
            Err(e) => Err((StageFailure::from(e), Some(raw))),
        }
    }
}

/// Describe why a stage result cannot be used. A successful result of the
/// wrong record kind is reported as a failure too.
fn failure_reason(result: Result<GeneratedRecords, (StageFailure, Option<String>)>) -> String {
    match result {
        Ok(_) => "model response did not match the requested task".to_string(),
        Err((failure, _)) => failure.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{ContentType, Difficulty, QuestionType};
    use lectern_llm::provider::mock::MockLlmProvider;
    use lectern_llm::LlmError;
    use std::sync::Arc;

    fn pipeline(mock: &Arc<MockLlmProvider>) -> StudyPipeline {
        StudyPipeline::new(GenerationInvoker::new(mock.clone()), GenerationConfig::default())
    }

    fn rich_content() -> ExtractedContent {
        ExtractedContent::from_text("The citric acid cycle oxidises acetyl-CoA in the mitochondrial matrix. ".repeat(5))
    }

    #[tokio::test]
    async fn flashcards_from_prose_wrapped_json() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text(r#"Here are your cards: [{"question":"Q","answer":"A"}] Thanks!"#);

        let response = pipeline(&mock).flashcards("Mitosis", 5).await;

        assert_eq!(response.flashcards, vec![FlashcardRecord::new("Q", "A")]);
        assert!(response.error.is_none());
        let calls = mock.calls();
        assert!(calls[0].0.contains("Generate 5 flashcards about Mitosis"));
        assert_eq!(calls[0].1, SamplingConfig::FLASHCARDS);
    }

    #[tokio::test]
    async fn flashcards_fall_back_on_provider_error() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_error(LlmError::ApiError { status: 429, body: "quota".into() });

        let response = pipeline(&mock).flashcards("Gene expression", 5).await;

        assert_eq!(response.flashcards[0].question, "What is the main concept of Gene expression?");
        assert!(response.flashcards.len() > 1);
        assert!(response.error.unwrap().contains("429"));
    }

    #[tokio::test]
    async fn unconfigured_invoker_falls_back_everywhere() {
        let pipeline = StudyPipeline::new(GenerationInvoker::unavailable("no key"), GenerationConfig::default());
        let raw = RawDocument::new(Vec::new(), "", "deck.pptx");

        let response = pipeline.analyze(raw, AnalysisKind::Both).await;

        let summaries = response.summaries.unwrap();
        assert_eq!(summaries[0].title, "Key Concepts Overview");
        let quiz = response.quiz_questions.unwrap();
        assert_eq!(quiz[0].answer, "B. Mitochondria");
        let warnings = response.warnings.unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Summary error: model provider not configured"));
        assert!(warnings[1].starts_with("Quiz error: model provider not configured"));
    }

    #[tokio::test]
    async fn empty_upload_uses_limited_prompts() {
        let mock = Arc::new(MockLlmProvider::new());
        let response = pipeline(&mock)
            .analyze(RawDocument::new(Vec::new(), "", "notes.txt"), AnalysisKind::Summary)
            .await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("could barely be extracted"));
        assert_eq!(calls[0].1, SamplingConfig::DOCUMENT);
        assert!(response.quiz_questions.is_none());
        assert_eq!(response.summaries.unwrap()[0].title, "Key Concepts Overview");
    }

    #[tokio::test]
    async fn invalid_quiz_answer_falls_back_with_warning() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text(r#"[{"question":"Q","options":["A. x","B. y"],"answer":"C. z"}]"#);

        let outcome = pipeline(&mock).quiz(&rich_content(), &DomainHint::none()).await;

        assert_eq!(outcome.quiz_questions.len(), 3);
        assert_eq!(outcome.warnings, vec!["Quiz error: model response had no valid records (1 rejected)".to_string()]);
    }

    #[tokio::test]
    async fn quiz_drafts_are_normalized() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text(
            r#"[{"question":"Is ATP made in mitochondria?","options":["True","False"],"answer":"True","type":"True/False"},
                {"question":"Define glycolysis.","answer":"Glucose breakdown to pyruvate."}]"#,
        );

        let outcome = pipeline(&mock).quiz(&rich_content(), &DomainHint::none()).await;

        assert!(outcome.warnings.is_empty());
        let first = &outcome.quiz_questions[0];
        assert_eq!(first.question_type, QuestionType::TrueFalse);
        assert_eq!(first.difficulty, Difficulty::Medium);
        assert_eq!(first.explanation, "No explanation provided");
        let second = &outcome.quiz_questions[1];
        assert!(second.options.is_empty());
        assert_eq!(second.question_type, QuestionType::MultipleChoice);
    }

    #[tokio::test]
    async fn headed_prose_summary_is_segmented_with_warning() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text("Glycolysis: Glucose is split.\n\nKrebs Cycle: Acetyl-CoA is oxidised.");

        let outcome = pipeline(&mock).summarize(&rich_content(), &DomainHint::none()).await;

        assert_eq!(outcome.summaries.len(), 2);
        assert_eq!(outcome.summaries[1].title, "Krebs Cycle");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("Summary warning: model response contained no JSON array"));
    }

    #[tokio::test]
    async fn refusal_summary_falls_back_to_domain_set() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text("I'm sorry, but I can't help with that request.");
        let anatomy = DomainHint::new(vec!["anatomy".to_string()]);

        let outcome = pipeline(&mock).summarize(&rich_content(), &anatomy).await;

        assert_eq!(outcome.summaries[0].title, "Anatomical Position and Planes");
        assert!(outcome.summaries.iter().all(|s| !s.title.starts_with("Slide Section")));
        assert_eq!(
            outcome.warnings,
            vec!["Summary error: model response contained no JSON array".to_string()]
        );
    }

    #[tokio::test]
    async fn unreadable_anatomy_pdf_gets_anatomy_fallback() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_text("I could not read that document.");
        mock.queue_text("Sorry, no questions.");
        let raw = RawDocument::new(b"%PDF-1.4\n%%EOF".to_vec(), "application/pdf", "anatomy_lecture.pdf");

        let response = pipeline(&mock).analyze(raw, AnalysisKind::Both).await;

        let summaries = response.summaries.unwrap();
        assert_eq!(summaries[0].title, "Anatomical Position and Planes");
        let quiz = response.quiz_questions.unwrap();
        assert_eq!(quiz[0].answer, "B. Coronal plane");
        let warnings = response.warnings.unwrap();
        assert!(warnings[0].starts_with("Summary error:"));
        assert!(warnings[1].starts_with("Quiz error:"));
        assert!(mock.calls().iter().all(|(prompt, _)| prompt.contains("anatomy")));
    }

    #[test]
    fn slides_response_uses_camel_case_and_omits_absent_parts() {
        let response = SlidesResponse {
            summaries: None,
            quiz_questions: Some(Vec::new()),
            warnings: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("quizQuestions").is_some());
        assert!(json.get("summaries").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn extracted_content_helper_marks_sparsity() {
        let content = rich_content();
        assert_eq!(content.content_type, ContentType::Plain);
        assert!(!content.is_sparse);
    }
}
