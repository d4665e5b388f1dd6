use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::document::ExtractedContent;
use crate::error::RequestError;

/// One unit of generation work. Each variant owns one prompt family and one
/// response schema.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationTask {
    Flashcards { topic: String, count: usize },
    Summary { content: ExtractedContent },
    Quiz { content: ExtractedContent },
}

impl GenerationTask {
    /// Short label used in logs and warnings.
    pub fn name(&self) -> &'static str {
        match self {
            GenerationTask::Flashcards { .. } => "flashcards",
            GenerationTask::Summary { .. } => "summary",
            GenerationTask::Quiz { .. } => "quiz",
        }
    }
}

/// Subject labels detected for a document, in taxonomy order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainHint {
    labels: Vec<String>,
}

impl DomainHint {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl std::fmt::Display for DomainHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.labels.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&self.labels.join(", "))
        }
    }
}

/// Which study artifacts to derive from an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Summary,
    Quiz,
    #[default]
    Both,
}

impl AnalysisKind {
    pub fn wants_summary(self) -> bool {
        matches!(self, AnalysisKind::Summary | AnalysisKind::Both)
    }

    pub fn wants_quiz(self) -> bool {
        matches!(self, AnalysisKind::Quiz | AnalysisKind::Both)
    }
}

impl FromStr for AnalysisKind {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(AnalysisKind::Summary),
            "quiz" => Ok(AnalysisKind::Quiz),
            "both" | "" => Ok(AnalysisKind::Both),
            _ => Err(RequestError::InvalidAnalysisKind(s.to_string())),
        }
    }
}
