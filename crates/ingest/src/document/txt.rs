const BOM: char = '\u{FEFF}';

/// Decode a plain-text payload: lossy UTF-8, BOM removed, LF line endings.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix(BOM).unwrap_or(text.as_ref());
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}
