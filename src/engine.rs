// WHY: the document engine is an injected capability so the anchoring
// pipeline never touches an ambient automation object and tests can run
// against an in-memory document

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::highlight::HighlightColor;

/// A contiguous, addressable span of document text in char offsets,
/// half-open (`start..end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Char position just past this range, the collapse-to-end point used to
    /// advance a search cursor.
    pub fn collapse_to_end(&self) -> usize {
        self.end
    }
}

/// Raised when a call into the external document engine fails; run-fatal.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document engine unavailable during {call}: {reason}")]
    Unavailable { call: &'static str, reason: String },
}

impl EngineError {
    pub fn unavailable(call: &'static str, reason: impl Into<String>) -> Self {
        EngineError::Unavailable {
            call,
            reason: reason.into(),
        }
    }
}

/// Operation set of the external document engine. All calls are synchronous
/// and blocking; any of them may fail with [`EngineError`].
pub trait DocumentEngine {
    /// Full current text of the document. Read fresh at the start of every
    /// run; the document may change between runs.
    fn full_text(&mut self) -> Result<String, EngineError>;

    /// First occurrence of `needle` at or after char offset `start`.
    /// Case-insensitive literal search; a space in the needle matches any
    /// single whitespace character. No wildcards.
    fn find_forward(&mut self, start: usize, needle: &str) -> Result<Option<Range>, EngineError>;

    /// Text currently covered by `range`.
    fn range_text(&mut self, range: Range) -> Result<String, EngineError>;

    /// Grow `range` by `delta_chars` characters, clamped at document end.
    fn extend(&mut self, range: Range, delta_chars: usize) -> Result<Range, EngineError>;

    /// Set the highlight attribute on `range`. Permanent; there is no undo.
    fn set_highlight(&mut self, range: Range, color: HighlightColor) -> Result<(), EngineError>;

    /// Disable revision tracking on the document.
    fn disable_revision_tracking(&mut self) -> Result<(), EngineError>;

    /// Accept all pending revisions. Not reversible by this component.
    fn accept_all_revisions(&mut self) -> Result<(), EngineError>;
}

/// A highlight recorded by [`PlainTextEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedHighlight {
    pub range: Range,
    pub color: HighlightColor,
    /// Document text covered by the range at the time the highlight was set
    pub text: String,
}

/// In-memory document engine over plain text. Backs the CLI and the test
/// suite with the same find/extend/highlight semantics the anchoring
/// algorithm assumes from the external engine.
#[derive(Debug, Clone)]
pub struct PlainTextEngine {
    chars: Vec<char>,
    highlights: Vec<AppliedHighlight>,
    revision_tracking: bool,
    pending_revisions: usize,
}

impl PlainTextEngine {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            highlights: Vec::new(),
            revision_tracking: true,
            pending_revisions: 0,
        }
    }

    /// Highlights applied so far, in application order.
    pub fn highlights(&self) -> &[AppliedHighlight] {
        &self.highlights
    }

    pub fn revision_tracking(&self) -> bool {
        self.revision_tracking
    }

    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    fn clamp(&self, pos: usize) -> usize {
        pos.min(self.chars.len())
    }

    fn chars_match(document: char, needle: char) -> bool {
        if needle == ' ' {
            return document.is_whitespace();
        }
        document == needle || document.to_lowercase().eq(needle.to_lowercase())
    }
}

impl DocumentEngine for PlainTextEngine {
    fn full_text(&mut self) -> Result<String, EngineError> {
        Ok(self.chars.iter().collect())
    }

    fn find_forward(&mut self, start: usize, needle: &str) -> Result<Option<Range>, EngineError> {
        let needle_chars: Vec<char> = needle.chars().collect();
        if needle_chars.is_empty() {
            return Ok(None);
        }

        let start = self.clamp(start);
        let doc = &self.chars[..];
        if needle_chars.len() > doc.len() {
            return Ok(None);
        }

        for pos in start..=doc.len().saturating_sub(needle_chars.len()) {
            let window = &doc[pos..pos + needle_chars.len()];
            if window
                .iter()
                .zip(needle_chars.iter())
                .all(|(&d, &n)| Self::chars_match(d, n))
            {
                let range = Range::new(pos, pos + needle_chars.len());
                debug!(start, ?range, "find_forward hit");
                return Ok(Some(range));
            }
        }
        Ok(None)
    }

    fn range_text(&mut self, range: Range) -> Result<String, EngineError> {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        Ok(self.chars[start..end].iter().collect())
    }

    fn extend(&mut self, range: Range, delta_chars: usize) -> Result<Range, EngineError> {
        // Clamped at document end, as the host engine clamps range growth
        let end = self.clamp(range.end + delta_chars);
        Ok(Range::new(range.start, end))
    }

    fn set_highlight(&mut self, range: Range, color: HighlightColor) -> Result<(), EngineError> {
        let text: String = {
            let start = self.clamp(range.start);
            let end = self.clamp(range.end);
            self.chars[start..end].iter().collect()
        };
        self.highlights.push(AppliedHighlight { range, color, text });
        Ok(())
    }

    fn disable_revision_tracking(&mut self) -> Result<(), EngineError> {
        self.revision_tracking = false;
        Ok(())
    }

    fn accept_all_revisions(&mut self) -> Result<(), EngineError> {
        self.pending_revisions = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_forward_basic() {
        let mut engine = PlainTextEngine::new("abc def abc");
        let range = engine.find_forward(0, "abc").unwrap().unwrap();
        assert_eq!(range, Range::new(0, 3));

        let range = engine.find_forward(1, "abc").unwrap().unwrap();
        assert_eq!(range, Range::new(8, 11));

        assert!(engine.find_forward(9, "abc").unwrap().is_none());
    }

    #[test]
    fn test_find_forward_case_insensitive() {
        let mut engine = PlainTextEngine::new("Le Système doit");
        let range = engine.find_forward(0, "le système").unwrap().unwrap();
        assert_eq!(range, Range::new(0, 10));
    }

    #[test]
    fn test_find_forward_space_matches_any_whitespace() {
        let mut engine = PlainTextEngine::new("hello\tworld\nagain");
        let range = engine.find_forward(0, "hello world").unwrap().unwrap();
        assert_eq!(range, Range::new(0, 11));
        let range = engine.find_forward(5, "world again").unwrap().unwrap();
        assert_eq!(range, Range::new(6, 17));
    }

    #[test]
    fn test_find_forward_empty_needle() {
        let mut engine = PlainTextEngine::new("text");
        assert!(engine.find_forward(0, "").unwrap().is_none());
    }

    #[test]
    fn test_find_forward_char_offsets_not_bytes() {
        let mut engine = PlainTextEngine::new("héé qui");
        let range = engine.find_forward(0, "qui").unwrap().unwrap();
        assert_eq!(range, Range::new(4, 7));
        assert_eq!(engine.range_text(range).unwrap(), "qui");
    }

    #[test]
    fn test_extend_clamps_at_document_end() {
        let mut engine = PlainTextEngine::new("short");
        let range = engine.extend(Range::new(0, 3), 100).unwrap();
        assert_eq!(range, Range::new(0, 5));
    }

    #[test]
    fn test_set_highlight_records_text() {
        let mut engine = PlainTextEngine::new("mark this span here");
        engine
            .set_highlight(Range::new(5, 14), HighlightColor::BrightGreen)
            .unwrap();
        assert_eq!(engine.highlights().len(), 1);
        assert_eq!(engine.highlights()[0].text, "this span");
        assert_eq!(engine.highlights()[0].color, HighlightColor::BrightGreen);
    }

    #[test]
    fn test_revision_preparation() {
        let mut engine = PlainTextEngine::new("doc");
        assert!(engine.revision_tracking());
        engine.disable_revision_tracking().unwrap();
        engine.accept_all_revisions().unwrap();
        assert!(!engine.revision_tracking());
    }
}
