// WHY: candidate sentences feed the fuzzy gate only; exact spans are always
// recovered through the engine's own find, never from these offsets

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::{debug, info};

/// A sentence-like segment of the normalized document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Segment text, already normalized because the splitter consumes
    /// normalized document text
    pub text: String,
    /// Char offset of the segment start within the normalized document text,
    /// kept as a diagnostic hint
    pub offset: usize,
}

/// Splits normalized document text on punctuation boundaries: a
/// sentence-ending character (`.`, `!`, `?`, `-`, or a closing bracket/quote)
/// immediately followed by whitespace.
pub struct SentenceSplitter {
    boundary: Regex,
}

impl SentenceSplitter {
    pub fn new() -> Result<Self> {
        // WHY: normalization has already folded guillemets and curly quotes to
        // straight quotes, so the closing-quote class is just " and '
        let boundary = Regex::new(r#"[.!?"')\]}-]\s+"#)?;
        debug!("Compiled sentence boundary pattern");
        Ok(Self { boundary })
    }

    /// Split into candidates, preserving document order. Empty segments are
    /// discarded. Order is only used for diagnostics; the matcher treats the
    /// result as an unordered pool.
    pub fn split(&self, normalized_text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        let mut segment_start = 0usize;

        // Incremental byte-to-char offset tracking for the offset hints
        let mut counted_bytes = 0usize;
        let mut counted_chars = 0usize;
        let mut chars_at = |byte_pos: usize, text: &str| {
            counted_chars += text[counted_bytes..byte_pos].chars().count();
            counted_bytes = byte_pos;
            counted_chars
        };

        for m in self.boundary.find_iter(normalized_text) {
            // The boundary punctuation belongs to the sentence; all boundary
            // characters are single-byte ASCII
            let segment_end = m.start() + 1;
            let segment = normalized_text[segment_start..segment_end].trim();
            if !segment.is_empty() {
                candidates.push(Candidate {
                    text: segment.to_string(),
                    offset: chars_at(segment_start, normalized_text),
                });
            }
            segment_start = m.end();
        }

        // Remaining text after the last boundary
        let tail = normalized_text[segment_start..].trim();
        if !tail.is_empty() {
            candidates.push(Candidate {
                text: tail.to_string(),
                offset: chars_at(segment_start, normalized_text),
            });
        }

        info!("Split document into {} candidate sentences", candidates.len());
        candidates
    }
}
