use lectern_core::{Difficulty, QuestionType, QuizDraft, QuizRecord};

pub const MISSING_QUESTION: &str = "Could not generate a proper question";
pub const MISSING_ANSWER: &str = "Could not determine the correct answer";
pub const MISSING_EXPLANATION: &str = "No explanation provided";

/// Reconcile a validated quiz draft into the canonical record.
///
/// Options and answer pass through untouched (membership was checked during
/// validation); missing fields get fixed placeholders one by one.
pub fn normalize(draft: QuizDraft) -> QuizRecord {
    QuizRecord {
        question: draft.question.unwrap_or_else(|| MISSING_QUESTION.to_string()),
        options: draft.options,
        answer: draft.answer.unwrap_or_else(|| MISSING_ANSWER.to_string()),
        explanation: draft.explanation.unwrap_or_else(|| MISSING_EXPLANATION.to_string()),
        question_type: draft.question_type.as_deref().map(question_type).unwrap_or_default(),
        difficulty: draft.difficulty.as_deref().map(difficulty).unwrap_or_default(),
    }
}

/// Lower-case and reduce to letters so "True/False", "true_false" and
/// "TRUE-FALSE" compare equal.
fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn question_type(raw: &str) -> QuestionType {
    match squash(raw).as_str() {
        "truefalse" | "tf" | "boolean" => QuestionType::TrueFalse,
        "casebased" | "case" | "casestudy" | "clinicalcase" | "scenario" => QuestionType::CaseBased,
        _ => QuestionType::MultipleChoice,
    }
}

fn difficulty(raw: &str) -> Difficulty {
    match squash(raw).as_str() {
        "easy" | "basic" | "beginner" => Difficulty::Easy,
        "hard" | "difficult" | "advanced" | "challenging" => Difficulty::Hard,
        _ => Difficulty::Medium,
    }
}
