//! Plain text decoding and cleanup

/// Decode text bytes as UTF-8, falling back to Latin-1 when the bytes are
/// not valid UTF-8 (legacy course exports)
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1 maps each byte to the code point of the same value, so
        // this decode cannot fail
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Collapse runs of whitespace so extracted text embeds cleanly
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result.trim().to_string()
}
