use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Cleaned text shorter than this many characters is treated as sparse.
pub const SPARSE_THRESHOLD_CHARS: usize = 200;

/// An uploaded payload as it arrived. Lives only for the duration of a request.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Bytes,
    /// Media type declared by the client (may be empty or wrong).
    pub declared_media_type: String,
    pub filename: String,
    pub size_bytes: usize,
}

impl RawDocument {
    pub fn new(bytes: impl Into<Bytes>, declared_media_type: impl Into<String>, filename: impl Into<String>) -> Self {
        let bytes = bytes.into();
        let size_bytes = bytes.len();
        Self {
            bytes,
            declared_media_type: declared_media_type.into(),
            filename: filename.into(),
            size_bytes,
        }
    }

    /// Lower-cased file extension, if the filename has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

/// How the extractor ended up reading a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Plain,
    Pdf,
    BinaryLimited,
    Empty,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentType::Plain => "plain",
            ContentType::Pdf => "pdf",
            ContentType::BinaryLimited => "binary_limited",
            ContentType::Empty => "empty",
        };
        f.write_str(s)
    }
}

/// Best-effort text pulled out of a [`RawDocument`].
///
/// `text` is never empty: the extractor substitutes a placeholder instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub text: String,
    pub content_type: ContentType,
    pub is_sparse: bool,
}

impl ExtractedContent {
    /// Wrap text that did not come from an upload (e.g. a CLI argument),
    /// computing sparsity from its length.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_sparse = is_sparse(&text);
        Self {
            text,
            content_type: ContentType::Plain,
            is_sparse,
        }
    }
}

/// True when `text` has fewer than [`SPARSE_THRESHOLD_CHARS`] non-blank characters.
pub fn is_sparse(text: &str) -> bool {
    text.trim().chars().count() < SPARSE_THRESHOLD_CHARS
}
