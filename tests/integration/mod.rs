// Integration test utilities and common code
// WHY: Centralized engine wrappers avoid duplication across integration tests

use spanmark::engine::{DocumentEngine, EngineError, PlainTextEngine, Range};
use spanmark::highlight::HighlightColor;

/// Engine wrapper that records every forward-find call for assertions about
/// call counts and cursor movement.
pub struct RecordingEngine {
    pub inner: PlainTextEngine,
    /// Start cursor of each find_forward call, in call order
    pub find_starts: Vec<usize>,
}

impl RecordingEngine {
    pub fn new(text: &str) -> Self {
        Self {
            inner: PlainTextEngine::new(text),
            find_starts: Vec::new(),
        }
    }

    pub fn find_calls(&self) -> usize {
        self.find_starts.len()
    }

    /// True when no find call started before an earlier one
    pub fn cursor_monotone(&self) -> bool {
        self.find_starts.windows(2).all(|w| w[0] <= w[1])
    }
}

impl DocumentEngine for RecordingEngine {
    fn full_text(&mut self) -> Result<String, EngineError> {
        self.inner.full_text()
    }

    fn find_forward(&mut self, start: usize, needle: &str) -> Result<Option<Range>, EngineError> {
        self.find_starts.push(start);
        self.inner.find_forward(start, needle)
    }

    fn range_text(&mut self, range: Range) -> Result<String, EngineError> {
        self.inner.range_text(range)
    }

    fn extend(&mut self, range: Range, delta_chars: usize) -> Result<Range, EngineError> {
        self.inner.extend(range, delta_chars)
    }

    fn set_highlight(&mut self, range: Range, color: HighlightColor) -> Result<(), EngineError> {
        self.inner.set_highlight(range, color)
    }

    fn disable_revision_tracking(&mut self) -> Result<(), EngineError> {
        self.inner.disable_revision_tracking()
    }

    fn accept_all_revisions(&mut self) -> Result<(), EngineError> {
        self.inner.accept_all_revisions()
    }
}

/// Engine wrapper that starts failing after a fixed number of find calls,
/// simulating the external engine becoming unreachable mid-run.
pub struct FailingEngine {
    pub inner: PlainTextEngine,
    pub fail_after_finds: usize,
    finds: usize,
}

impl FailingEngine {
    pub fn new(text: &str, fail_after_finds: usize) -> Self {
        Self {
            inner: PlainTextEngine::new(text),
            fail_after_finds,
            finds: 0,
        }
    }
}

impl DocumentEngine for FailingEngine {
    fn full_text(&mut self) -> Result<String, EngineError> {
        self.inner.full_text()
    }

    fn find_forward(&mut self, start: usize, needle: &str) -> Result<Option<Range>, EngineError> {
        if self.finds >= self.fail_after_finds {
            return Err(EngineError::unavailable(
                "find_forward",
                "document process is gone",
            ));
        }
        self.finds += 1;
        self.inner.find_forward(start, needle)
    }

    fn range_text(&mut self, range: Range) -> Result<String, EngineError> {
        self.inner.range_text(range)
    }

    fn extend(&mut self, range: Range, delta_chars: usize) -> Result<Range, EngineError> {
        self.inner.extend(range, delta_chars)
    }

    fn set_highlight(&mut self, range: Range, color: HighlightColor) -> Result<(), EngineError> {
        self.inner.set_highlight(range, color)
    }

    fn disable_revision_tracking(&mut self) -> Result<(), EngineError> {
        self.inner.disable_revision_tracking()
    }

    fn accept_all_revisions(&mut self) -> Result<(), EngineError> {
        self.inner.accept_all_revisions()
    }
}
