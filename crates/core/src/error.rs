use thiserror::Error;

/// A malformed inbound request. The only failure surfaced to callers as 4xx.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Topic is required")]
    MissingTopic,

    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid analysis type '{0}'. Expected 'summary', 'quiz', or 'both'")]
    InvalidAnalysisKind(String),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}
