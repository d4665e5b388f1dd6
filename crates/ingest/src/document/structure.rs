use std::sync::LazyLock;

use regex::Regex;

/// An outline marker (`IV.`, `A.`, `12.`, `b)`) preceded by other text on the same line.
static INLINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\n])[ \t]*\b((?:[IVX]{1,5}|[A-Z]|\d+)\.[ \t]+|[a-z]\)[ \t]+)").unwrap()
});

/// Move outline markers that extraction flattened into running text back
/// onto their own lines.
pub fn mark_structure(text: &str) -> String {
    INLINE_MARKER.replace_all(text, "$1\n$2").into_owned()
}
