//! Turning free-form model output into validated records.

mod notes;
mod validate;

pub use notes::segment_notes;
pub use validate::ValidationRejection;

use lectern_core::{GeneratedRecords, GenerationTask};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("model response contained no JSON array")]
    NoJsonArray,
    #[error("model response contained invalid JSON: {0}")]
    InvalidJson(String),
    #[error("model response JSON is not an array")]
    NotAnArray,
    #[error("model response had no valid records ({rejected} rejected)")]
    NoValidRecords { rejected: usize },
}

/// Locate the JSON array in a model response: everything from the first `[`
/// to the last `]`.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse a model response for `task` and keep only the records that satisfy
/// the task's schema. Partial success is returned as-is.
pub fn parse_and_validate(task: &GenerationTask, raw: &str) -> Result<GeneratedRecords, ParseFailure> {
    let items = parse_array(raw)?;
    let total = items.len();

    let mut rejections = Vec::new();
    let records = match task {
        GenerationTask::Flashcards { .. } => {
            GeneratedRecords::Flashcards(validate::flashcards(&items, &mut rejections))
        }
        GenerationTask::Summary { .. } => {
            GeneratedRecords::Summaries(validate::summaries(&items, &mut rejections))
        }
        GenerationTask::Quiz { .. } => GeneratedRecords::Quiz(validate::quiz(&items, &mut rejections)),
    };

    for rejection in &rejections {
        debug!(task = task.name(), %rejection, "Dropped invalid record");
    }

    if records.is_empty() {
        return Err(ParseFailure::NoValidRecords {
            rejected: rejections.len(),
        });
    }

    debug!(task = task.name(), kept = records.len(), total, "Validated model records");
    Ok(records)
}

fn parse_array(raw: &str) -> Result<Vec<Value>, ParseFailure> {
    let Some(json) = extract_json_array(raw) else {
        // A bare object (or other JSON value) is reported as such rather than as missing.
        return match serde_json::from_str::<Value>(strip_code_fence(raw)) {
            Ok(_) => Err(ParseFailure::NotAnArray),
            Err(_) => Err(ParseFailure::NoJsonArray),
        };
    };

    match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(ParseFailure::NotAnArray),
        Err(e) => Err(ParseFailure::InvalidJson(e.to_string())),
    }
}

/// Strip a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.find('\n').map_or("", |n| &rest[n + 1..]);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{ContentType, ExtractedContent, FlashcardRecord};

    fn flashcards_task() -> GenerationTask {
        GenerationTask::Flashcards {
            topic: "cells".into(),
            count: 5,
        }
    }

    fn quiz_task() -> GenerationTask {
        GenerationTask::Quiz {
            content: ExtractedContent {
                text: "x".into(),
                content_type: ContentType::Plain,
                is_sparse: true,
            },
        }
    }

    #[test]
    fn extract_array_surrounded_by_prose() {
        let text = r#"Here are your cards: [{"question":"Q","answer":"A"}] Thanks!"#;
        assert_eq!(extract_json_array(text), Some(r#"[{"question":"Q","answer":"A"}]"#));
    }

    #[test]
    fn extract_array_without_brackets() {
        assert_eq!(extract_json_array("no json here"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
    }

    #[test]
    fn extract_spans_multiple_arrays_greedily() {
        let text = "first [1] then [2]";
        assert_eq!(extract_json_array(text), Some("[1] then [2]"));
        assert!(matches!(
            parse_and_validate(&flashcards_task(), text),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn prose_wrapped_flashcards_parse() {
        let raw = r#"Here are your cards: [{"question":"Q","answer":"A"}] Thanks!"#;
        let records = parse_and_validate(&flashcards_task(), raw).unwrap();
        assert_eq!(records, GeneratedRecords::Flashcards(vec![FlashcardRecord::new("Q", "A")]));
    }

    #[test]
    fn code_fenced_array_parses() {
        let raw = "```json\n[{\"question\": \" Q \", \"answer\": \"A\"}]\n```";
        let records = parse_and_validate(&flashcards_task(), raw).unwrap();
        assert_eq!(records, GeneratedRecords::Flashcards(vec![FlashcardRecord::new("Q", "A")]));
    }

    #[test]
    fn truncated_array_is_invalid_json() {
        let raw = r#"[{"question":"Q","answer":"A"}, {"question":"Q2", "ans]"#;
        assert!(matches!(
            parse_and_validate(&flashcards_task(), raw),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn missing_array_is_reported() {
        assert_eq!(
            parse_and_validate(&flashcards_task(), "I cannot help with that."),
            Err(ParseFailure::NoJsonArray)
        );
    }

    #[test]
    fn bare_object_is_not_an_array() {
        let raw = "```json\n{\"question\": \"Q\", \"answer\": \"A\"}\n```";
        assert_eq!(parse_and_validate(&flashcards_task(), raw), Err(ParseFailure::NotAnArray));
    }

    #[test]
    fn schema_violating_array_has_no_valid_records() {
        let raw = r#"[{"front":"Q","back":"A"}, "loose string", {"question":"  ","answer":"A"}]"#;
        assert_eq!(
            parse_and_validate(&flashcards_task(), raw),
            Err(ParseFailure::NoValidRecords { rejected: 3 })
        );
    }

    #[test]
    fn partial_success_is_not_padded() {
        let raw = r#"[{"question":"Q1","answer":"A1"}, {"question":"Q2"}]"#;
        let records = parse_and_validate(&flashcards_task(), raw).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn quiz_answer_outside_options_is_dropped() {
        let raw = r#"[{"question":"Q","options":["A. x","B. y"],"answer":"C. z"}]"#;
        assert_eq!(
            parse_and_validate(&quiz_task(), raw),
            Err(ParseFailure::NoValidRecords { rejected: 1 })
        );
    }
}
