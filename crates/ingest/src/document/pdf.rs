use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use regex::Regex;

use super::ExtractionError;

static INFO_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(Title|Author|Subject)\s*\(([^)]*)\)").unwrap());

static PAGE_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/Type\s*/Page\b").unwrap());

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Run the PDF text extractor. The parser can panic on malformed input, so
/// panics are caught and reported as errors.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return Err(ExtractionError::PdfError(e.to_string())),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            return Err(ExtractionError::PdfPanic(message));
        }
    };

    // Pages are separated by form feeds.
    let text = text.replace("\r\n", "\n").replace('\x0C', "\n\n");
    Ok(EXCESS_BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned())
}

/// Scan the Info dictionary and page objects for a short metadata header.
/// Returns an empty string when nothing useful is found.
pub fn metadata_header(bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(bytes);

    let mut title = None;
    let mut author = None;
    let mut subject = None;
    for caps in INFO_FIELD.captures_iter(&raw) {
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        let slot = match &caps[1] {
            "Title" => &mut title,
            "Author" => &mut author,
            _ => &mut subject,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    let pages = PAGE_OBJECT.find_iter(&raw).count();

    let mut lines = Vec::new();
    if let Some(t) = title {
        lines.push(format!("PDF Title: {}", t));
    }
    if let Some(a) = author {
        lines.push(format!("PDF Author: {}", a));
    }
    if let Some(s) = subject {
        lines.push(format!("PDF Subject: {}", s));
    }
    if pages > 0 {
        lines.push(format!("PDF Pages: {}", pages));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lists_found_fields_in_order() {
        let bytes = b"%PDF-1.7 << /Subject (Cardiac cycle) /Title (Heart) >> \
                      << /Type /Pages /Count 2 >> << /Type /Page >> << /Type/Page >>";
        let header = metadata_header(bytes);
        assert_eq!(header, "PDF Title: Heart\nPDF Subject: Cardiac cycle\nPDF Pages: 2");
    }

    #[test]
    fn blank_fields_are_skipped() {
        let header = metadata_header(b"%PDF-1.4 << /Title () /Author (  ) >>");
        assert!(header.is_empty());
    }

    #[test]
    fn garbage_pdf_reports_error_instead_of_panicking() {
        assert!(extract_pdf(b"%PDF-1.4 not really a pdf").is_err());
    }
}
