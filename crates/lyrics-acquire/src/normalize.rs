use unicode_normalization::UnicodeNormalization;

/// Normalize extracted text to NFC and tidy line edges.
///
/// Each line is trimmed on both sides (markup indentation is not part of
/// the lyrics), and leading/trailing blank lines are dropped. Finnish
/// text is common in the catalog, so decomposed `ä`/`ö` are composed.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();

    nfc.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

/// Collapse runs of HTML whitespace inside a text node to a single space.
pub fn collapse_whitespace(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut prev_space = false;

    for c in input.chars() {
        if c.is_ascii_whitespace() {
            if !prev_space {
                result.push(' ');
            }
            prev_space = true;
        } else {
            result.push(c);
            prev_space = false;
        }
    }

    result
}
