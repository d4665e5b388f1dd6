use std::sync::LazyLock;

use lectern_core::SummaryRecord;
use regex::Regex;

/// Paragraph breaks and bullet markers separate sections of prose notes.
static SECTION_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n|\n-\s+|\n•\s+").unwrap());

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*?):").unwrap());

/// Longest `Heading:` prefix still treated as a title.
const MAX_TITLE_CHARS: usize = 80;

/// Fewest `Heading:` sections that make prose notes usable as a summary.
const MIN_SECTIONS: usize = 2;

/// Split prose notes into titled sections. Used when a summary response
/// carries no JSON array at all. Only text that is clearly organised as
/// notes qualifies: at least two sections, every one opening with a
/// `Heading:`. Anything else, such as a refusal, yields nothing.
pub fn segment_notes(text: &str) -> Vec<SummaryRecord> {
    let mut records = Vec::new();
    for paragraph in SECTION_BREAK.split(text.trim()) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        let Some((title, summary)) = heading(paragraph) else {
            return Vec::new();
        };
        if summary.is_empty() {
            continue;
        }
        records.push(SummaryRecord::new(title, summary));
    }

    if records.len() < MIN_SECTIONS {
        return Vec::new();
    }
    records
}

fn heading(paragraph: &str) -> Option<(String, &str)> {
    let caps = HEADING.captures(paragraph)?;
    let whole = caps.get(0)?;
    let title = clean_title(&caps[1]);
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        return None;
    }
    Some((title, paragraph[whole.end()..].trim()))
}

fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(['#', '-', '•'])
        .trim_matches('*')
        .trim()
        .to_string()
}
