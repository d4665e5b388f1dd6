//! Study records produced by the pipeline.
//!
//! Every record is built fresh per request; nothing here is persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ── Flashcards ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashcardRecord {
    pub question: String,
    pub answer: String,
}

impl FlashcardRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

// ── Summaries ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryRecord {
    pub title: String,
    pub summary: String,
}

impl SummaryRecord {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// Title used when a section arrives without one (1-based).
    pub fn positional_title(position: usize) -> String {
        format!("Slide Section {}", position)
    }
}

// ── Quiz ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    CaseBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Canonical quiz question returned to callers.
///
/// When `options` is non-empty, `answer` is exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuizRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
}

/// A quiz item that passed validation but whose optional fields may still be
/// missing. `question_type` and `difficulty` keep the model's raw spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDraft {
    pub question: Option<String>,
    pub options: Vec<String>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
    pub question_type: Option<String>,
    pub difficulty: Option<String>,
}

impl From<&QuizRecord> for QuizDraft {
    fn from(record: &QuizRecord) -> Self {
        let question_type = match record.question_type {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::TrueFalse => "true-false",
            QuestionType::CaseBased => "case-based",
        };
        let difficulty = match record.difficulty {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        Self {
            question: Some(record.question.clone()),
            options: record.options.clone(),
            answer: Some(record.answer.clone()),
            explanation: Some(record.explanation.clone()),
            question_type: Some(question_type.to_string()),
            difficulty: Some(difficulty.to_string()),
        }
    }
}

// ── Task output ───────────────────────────────────────────────

/// Records produced for one generation task, already schema-valid.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedRecords {
    Flashcards(Vec<FlashcardRecord>),
    Summaries(Vec<SummaryRecord>),
    Quiz(Vec<QuizDraft>),
}

impl GeneratedRecords {
    pub fn len(&self) -> usize {
        match self {
            GeneratedRecords::Flashcards(v) => v.len(),
            GeneratedRecords::Summaries(v) => v.len(),
            GeneratedRecords::Quiz(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_flashcards(self) -> Option<Vec<FlashcardRecord>> {
        match self {
            GeneratedRecords::Flashcards(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_summaries(self) -> Option<Vec<SummaryRecord>> {
        match self {
            GeneratedRecords::Summaries(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_quiz(self) -> Option<Vec<QuizDraft>> {
        match self {
            GeneratedRecords::Quiz(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_record_wire_shape() {
        let record = QuizRecord {
            question: "Q".into(),
            options: vec!["True".into(), "False".into()],
            answer: "True".into(),
            explanation: "E".into(),
            question_type: QuestionType::TrueFalse,
            difficulty: Difficulty::Hard,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "true-false");
        assert_eq!(json["difficulty"], "hard");
        assert!(json.get("question_type").is_none());
    }

    #[test]
    fn generated_records_unwrap_only_their_own_kind() {
        let records = GeneratedRecords::Summaries(vec![SummaryRecord::new("T", "S")]);
        assert_eq!(records.clone().into_summaries().map(|v| v.len()), Some(1));
        assert!(records.clone().into_flashcards().is_none());
        assert!(records.into_quiz().is_none());
    }

    #[test]
    fn positional_titles_are_one_based() {
        assert_eq!(SummaryRecord::positional_title(1), "Slide Section 1");
    }

    #[test]
    fn draft_from_record_keeps_every_field() {
        let record = QuizRecord {
            question: "Which organelle makes ATP?".into(),
            options: vec!["Mitochondria".into(), "Ribosome".into()],
            answer: "Mitochondria".into(),
            explanation: "Oxidative phosphorylation.".into(),
            question_type: QuestionType::CaseBased,
            difficulty: Difficulty::Easy,
        };
        let draft = QuizDraft::from(&record);
        assert_eq!(draft.question_type.as_deref(), Some("case-based"));
        assert_eq!(draft.difficulty.as_deref(), Some("easy"));
        assert_eq!(draft.answer.as_deref(), Some("Mitochondria"));
    }
}
