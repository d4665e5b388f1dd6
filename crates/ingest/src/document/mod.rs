//! Best-effort text extraction from uploaded payloads.
//!
//! [`extract`] never fails: unreadable input degrades into explanatory text
//! so the prompt stage always has something to work with.

mod binary;
mod pdf;
mod structure;
mod txt;

use lectern_core::{is_sparse, ContentType, ExtractedContent, RawDocument};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("PDF parser panicked: {0}")]
    PdfPanic(String),
}

/// How many leading characters are inspected for binary detection.
const SNIFF_CHARS: usize = 500;

/// Fraction of non-printable characters in the sniff window that marks a payload as binary.
const BINARY_RATIO: f64 = 0.10;

/// Local-file header of zip containers (docx, pptx, xlsx).
const ZIP_MARKER: &[u8] = b"PK\x03\x04";

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Readers accept a PDF header anywhere in the first KiB.
const PDF_HEADER_WINDOW: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadKind {
    Pdf,
    Binary,
    Plain,
}

/// Extract plain text from a raw upload.
pub fn extract(raw: &RawDocument) -> ExtractedContent {
    if raw.bytes.is_empty() {
        info!(filename = %raw.filename, "Empty upload");
        return empty(raw);
    }

    let kind = sniff(raw);
    debug!(filename = %raw.filename, size = raw.size_bytes, kind = ?kind, "Sniffed payload");

    let content = match kind {
        PayloadKind::Pdf => from_pdf(raw),
        PayloadKind::Binary => from_binary(raw),
        PayloadKind::Plain => from_plain(raw),
    };

    info!(
        filename = %raw.filename,
        content_type = %content.content_type,
        sparse = content.is_sparse,
        chars = content.text.chars().count(),
        "Extracted document content"
    );
    content
}

/// A leading `%PDF-` always means PDF; a header further into the first KiB
/// counts only when the upload also claims to be a PDF. Zip containers are
/// recognised by their first local-file header at offset 0.
fn sniff(raw: &RawDocument) -> PayloadKind {
    let bytes = &raw.bytes[..];
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    if bytes.starts_with(PDF_SIGNATURE) || (declares_pdf(raw) && contains(window, PDF_SIGNATURE)) {
        return PayloadKind::Pdf;
    }
    if bytes.starts_with(ZIP_MARKER) {
        return PayloadKind::Binary;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_CHARS * 4)]);
    let mut total = 0usize;
    let mut unprintable = 0usize;
    for ch in head.chars().take(SNIFF_CHARS) {
        total += 1;
        if is_unprintable(ch) {
            unprintable += 1;
        }
    }
    if total > 0 && unprintable as f64 / total as f64 >= BINARY_RATIO {
        PayloadKind::Binary
    } else {
        PayloadKind::Plain
    }
}

fn declares_pdf(raw: &RawDocument) -> bool {
    raw.declared_media_type.eq_ignore_ascii_case("application/pdf") || raw.extension().as_deref() == Some("pdf")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Control characters (other than line breaks and tabs) and decoding
/// replacement characters.
fn is_unprintable(ch: char) -> bool {
    (ch.is_control() && !matches!(ch, '\n' | '\r' | '\t')) || ch == char::REPLACEMENT_CHARACTER
}

// ── Per-kind paths ────────────────────────────────────────────

fn from_plain(raw: &RawDocument) -> ExtractedContent {
    let text = structure::mark_structure(&txt::decode_text(&raw.bytes));
    if text.trim().is_empty() {
        return empty(raw);
    }
    let is_sparse = is_sparse(&text);
    ExtractedContent {
        text,
        content_type: ContentType::Plain,
        is_sparse,
    }
}

fn from_binary(raw: &RawDocument) -> ExtractedContent {
    let body = binary::sanitize(&String::from_utf8_lossy(&raw.bytes));
    let body = structure::mark_structure(&body);
    limited(raw, String::new(), body)
}

fn from_pdf(raw: &RawDocument) -> ExtractedContent {
    let header = pdf::metadata_header(&raw.bytes);

    let body = match pdf::extract_pdf(&raw.bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(filename = %raw.filename, error = %e, "PDF text extraction failed, degrading to limited content");
            String::new()
        }
    };
    let body = structure::mark_structure(&body);

    if !is_sparse(&body) {
        let text = if header.is_empty() {
            body
        } else {
            format!("{}\n\n{}", header, body)
        };
        return ExtractedContent {
            text,
            content_type: ContentType::Pdf,
            is_sparse: false,
        };
    }

    let body = binary::sanitize(&body);
    limited(raw, header, body)
}

/// Build a `BinaryLimited` result, wrapping sparse bodies in an explanation
/// of what the file probably is.
fn limited(raw: &RawDocument, header: String, body: String) -> ExtractedContent {
    let is_sparse = is_sparse(&body);
    let body = if is_sparse {
        format!(
            "This appears to be a {} file with limited text content that can be extracted directly. \
             The document may contain images, charts, or formatted text that is not easily extractable as plain text.\n\n{}",
            describe_file_type(raw),
            body
        )
    } else {
        body
    };

    let text = if header.is_empty() {
        body.trim_end().to_string()
    } else {
        format!("{}\n\n{}", header, body.trim_end())
    };

    ExtractedContent {
        text,
        content_type: ContentType::BinaryLimited,
        is_sparse,
    }
}

fn empty(raw: &RawDocument) -> ExtractedContent {
    let name = if raw.filename.trim().is_empty() {
        "document"
    } else {
        raw.filename.as_str()
    };
    ExtractedContent {
        text: format!(
            "This file ({}) appears to contain no extractable text content. \
             It may contain only images, charts, or other non-text elements. \
             Base the study material on the subject suggested by the file name and any detected domain.",
            name
        ),
        content_type: ContentType::Empty,
        is_sparse: true,
    }
}

fn describe_file_type(raw: &RawDocument) -> String {
    let declared = raw.declared_media_type.trim();
    if !declared.is_empty() && declared != "application/octet-stream" {
        return declared.to_string();
    }
    raw.extension().unwrap_or_else(|| "binary".to_string())
}
