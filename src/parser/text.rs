//! Text decoding and script helpers.

/// Check if a character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF          // CJK Unified Ideographs
        | 0x3400..=0x4DBF        // Extension A
        | 0x20000..=0x2EBEF      // Extensions B-F
        | 0x3040..=0x309F        // Hiragana
        | 0x30A0..=0x30FF        // Katakana
        | 0x3000..=0x303F // CJK Symbols and Punctuation
    )
}

/// Decode a string operand when the font gives no usable encoding.
///
/// Tries UTF-16BE (with BOM), then UTF-8, then Latin-1.
pub(crate) fn decode_text_fallback(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Whether a space belongs between `prev` and `next` text.
pub(crate) fn needs_space(prev: &str, next: &str) -> bool {
    let (Some(last), Some(first)) = (prev.chars().last(), next.chars().next()) else {
        return false;
    };
    if last.is_whitespace() || first.is_whitespace() {
        return false;
    }
    !(is_spaceless_script_char(last) && is_spaceless_script_char(first))
}
