// WHY: one normalization routine shared by document text, query sentences, and
// verification of engine-returned ranges, so every comparison is like-for-like

use unicode_normalization::UnicodeNormalization;

/// Normalize text into comparison-safe form: NFC composition, typographic
/// folding (curly quotes, guillemets, em/en dashes, NBSP), C0/C1 control
/// stripping, whitespace collapsing, and trimming.
pub fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_into(text, &mut result);
    result
}

/// Normalize into supplied buffer to avoid allocation
/// WHY: enables buffer reuse when normalizing every candidate sentence of a document
pub fn normalize_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    // WHY: starting in "after space" state suppresses leading whitespace
    let mut prev_was_space = true;

    for ch in text.nfc() {
        match ch {
            // Includes \r, \n, \t, NBSP and Unicode space separators
            c if c.is_whitespace() => {
                if !prev_was_space {
                    buffer.push(' ');
                    prev_was_space = true;
                }
            }
            '\u{2013}' | '\u{2014}' => {
                // en dash, em dash
                buffer.push('-');
                prev_was_space = false;
            }
            '\u{00AB}' | '\u{00BB}' | '\u{201C}' | '\u{201D}' => {
                // guillemets and curly double quotes
                buffer.push('"');
                prev_was_space = false;
            }
            '\u{2018}' | '\u{2019}' => {
                // curly single quotes
                buffer.push('\'');
                prev_was_space = false;
            }
            c if is_stripped_control(c) => {
                // C0/C1 controls carry no comparable content
            }
            c => {
                buffer.push(c);
                prev_was_space = false;
            }
        }
    }

    // Trailing space from a whitespace run at end of input
    if buffer.ends_with(' ') {
        buffer.pop();
    }
}

/// C0 and C1 control characters, except the whitespace controls which the
/// whitespace arm already collapses.
fn is_stripped_control(c: char) -> bool {
    let code = c as u32;
    code < 0x20 || (0x7F..=0x9F).contains(&code)
}
