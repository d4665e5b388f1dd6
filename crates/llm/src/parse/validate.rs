use lectern_core::{FlashcardRecord, QuizDraft, SummaryRecord};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a single record was dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationRejection {
    #[error("item {index} is not an object")]
    NotAnObject { index: usize },
    #[error("item {index} is missing '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("item {index} has an empty '{field}'")]
    EmptyField { index: usize, field: &'static str },
    #[error("item {index} has a non-string option")]
    NonStringOption { index: usize },
    #[error("item {index} answer does not match any option")]
    AnswerNotInOptions { index: usize },
    #[error("item {index} answer matches more than one option")]
    AmbiguousAnswer { index: usize },
    #[error("item {index} answer index {answer_index} is out of range")]
    AnswerIndexOutOfRange { index: usize, answer_index: i64 },
}

type Rejections = Vec<ValidationRejection>;

pub(super) fn flashcards(items: &[Value], rejections: &mut Rejections) -> Vec<FlashcardRecord> {
    collect(items, rejections, |index, obj| {
        Ok(FlashcardRecord {
            question: required_text(obj, index, "question")?,
            answer: required_text(obj, index, "answer")?,
        })
    })
}

pub(super) fn summaries(items: &[Value], rejections: &mut Rejections) -> Vec<SummaryRecord> {
    let mut kept = 0usize;
    collect(items, rejections, |index, obj| {
        let summary = required_text(obj, index, "summary")?;
        kept += 1;
        let title = optional_text(obj, "title").unwrap_or_else(|| SummaryRecord::positional_title(kept));
        Ok(SummaryRecord { title, summary })
    })
}

pub(super) fn quiz(items: &[Value], rejections: &mut Rejections) -> Vec<QuizDraft> {
    collect(items, rejections, |index, obj| {
        let question = required_text(obj, index, "question")?;
        let options = options(obj, index)?;
        let answer = answer(obj, index, &options)?;
        Ok(QuizDraft {
            question: Some(question),
            options,
            answer: Some(answer),
            explanation: optional_text(obj, "explanation"),
            question_type: optional_text(obj, "type"),
            difficulty: optional_text(obj, "difficulty"),
        })
    })
}

fn collect<T>(
    items: &[Value],
    rejections: &mut Rejections,
    mut validate: impl FnMut(usize, &Map<String, Value>) -> Result<T, ValidationRejection>,
) -> Vec<T> {
    let mut out = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let result = match item.as_object() {
            Some(obj) => validate(index, obj),
            None => Err(ValidationRejection::NotAnObject { index }),
        };
        match result {
            Ok(record) => out.push(record),
            Err(rejection) => rejections.push(rejection),
        }
    }
    out
}

fn required_text(obj: &Map<String, Value>, index: usize, field: &'static str) -> Result<String, ValidationRejection> {
    let value = obj
        .get(field)
        .and_then(Value::as_str)
        .ok_or(ValidationRejection::MissingField { index, field })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationRejection::EmptyField { index, field });
    }
    Ok(trimmed.to_string())
}

fn optional_text(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Options are optional; when present every entry must be a string.
fn options(obj: &Map<String, Value>, index: usize) -> Result<Vec<String>, ValidationRejection> {
    match obj.get("options") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or(ValidationRejection::NonStringOption { index })
            })
            .collect(),
        Some(_) => Err(ValidationRejection::NonStringOption { index }),
    }
}

/// Resolve the correct answer. A string must match exactly one option; an
/// integer `correctIndex` or `answer` picks the option it points at. When a
/// string answer and an index are both given they must agree.
fn answer(obj: &Map<String, Value>, index: usize, options: &[String]) -> Result<String, ValidationRejection> {
    if options.is_empty() {
        return required_text(obj, index, "answer");
    }

    let stated = match obj.get("answer") {
        None | Some(Value::Null) | Some(Value::Number(_)) => None,
        Some(_) => Some(member(required_text(obj, index, "answer")?, index, options)?),
    };
    let pointer = obj
        .get("correctIndex")
        .and_then(Value::as_i64)
        .or_else(|| obj.get("answer").and_then(Value::as_i64));
    let pointed = pointer
        .map(|answer_index| {
            usize::try_from(answer_index)
                .ok()
                .and_then(|i| options.get(i))
                .cloned()
                .ok_or(ValidationRejection::AnswerIndexOutOfRange { index, answer_index })
        })
        .transpose()?;

    match (stated, pointed) {
        (Some(stated), Some(pointed)) if stated != pointed => Err(ValidationRejection::AnswerNotInOptions { index }),
        (Some(answer), _) | (None, Some(answer)) => Ok(answer),
        (None, None) => required_text(obj, index, "answer"),
    }
}

fn member(answer: String, index: usize, options: &[String]) -> Result<String, ValidationRejection> {
    match options.iter().filter(|o| **o == answer).count() {
        0 => Err(ValidationRejection::AnswerNotInOptions { index }),
        1 => Ok(answer),
        _ => Err(ValidationRejection::AmbiguousAnswer { index }),
    }
}
