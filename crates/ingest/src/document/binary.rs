use std::sync::LazyLock;

use regex::{Captures, Regex};

static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\\([nrt\\"])"#).unwrap());

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

static LINE_PADDING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]*\n[ \t]*").unwrap());

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Scrub text decoded from a binary payload down to printable ASCII and
/// line structure.
pub fn sanitize(raw: &str) -> String {
    let without_controls: String = raw
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => c,
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    let unescaped = ESCAPE_SEQUENCE.replace_all(&without_controls, |caps: &Captures| {
        match &caps[1] {
            "n" => "\n",
            "r" => "\n",
            "t" => "\t",
            "\\" => "\\",
            _ => "\"",
        }
    });

    let printable: String = unescaped
        .chars()
        .map(|c| match c {
            '\r' => '\n',
            '\n' | '\t' | ' '..='~' => c,
            _ => ' ',
        })
        .collect();

    let collapsed = BLANK_RUN.replace_all(&printable, " ");
    let collapsed = LINE_PADDING.replace_all(&collapsed, "\n");
    EXCESS_BLANK_LINES
        .replace_all(&collapsed, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_become_spaces() {
        assert_eq!(sanitize("a\u{0}\u{1}b\u{7f}c"), "a b c");
    }

    #[test]
    fn escape_sequences_are_unescaped() {
        assert_eq!(sanitize(r#"Line one\nLine two\tend \"quoted\" C:\\path"#), "Line one\nLine two\tend \"quoted\" C:\\path");
    }

    #[test]
    fn non_ascii_and_replacement_chars_are_blanked() {
        assert_eq!(sanitize("Gl\u{FFFD}\u{FFFD}ucose \u{00e9}t\u{00e9}"), "Gl ucose t");
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(sanitize("  alpha     beta \n\n\n\n  gamma  "), "alpha beta\n\ngamma");
    }
}
