// WHY: the audit trail is buffered in memory and flushed once at run end, so
// a partial write can never desynchronize the log from the run and tests can
// assert against the buffer directly

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;
use tracing::warn;

use crate::anchor::{NotFoundCause, SearchStrategy};
use crate::engine::Range;
use crate::highlight::HighlightColor;

/// Longest text excerpt reproduced in the log.
const PREVIEW_CHARS: usize = 100;

/// One recorded decision of a highlighting run, in run order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    RevisionTrackingDisabled,
    RevisionsAccepted,
    DocumentRead {
        chars: usize,
    },
    CandidateExtracted {
        index: usize,
        preview: String,
        len: usize,
    },
    InputCounts {
        supplied: usize,
        unique: usize,
    },
    QueryStarted {
        index: usize,
        raw: String,
    },
    QueryNormalized {
        normalized: String,
        len: usize,
    },
    FuzzyAccepted {
        best: String,
        score: u8,
    },
    FuzzyRejected {
        best_score: u8,
    },
    SearchAttempt {
        attempt: usize,
        strategy: SearchStrategy,
        needle: String,
    },
    RangeCompared {
        found: String,
        matched: bool,
    },
    Highlighted {
        range: Range,
        color: HighlightColor,
    },
    SearchExhausted {
        cause: NotFoundCause,
    },
    EngineFailure {
        message: String,
    },
}

/// Append-only trace of one highlighting run. Never influences control flow;
/// a failed flush is reported through tracing and swallowed.
#[derive(Debug)]
pub struct AuditLog {
    document_label: String,
    threshold: u8,
    started: String,
    events: Vec<AuditEvent>,
}

impl AuditLog {
    pub fn new(document_label: impl Into<String>, threshold: u8) -> Self {
        Self {
            document_label: document_label.into(),
            threshold,
            started: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event: AuditEvent) {
        self.events.push(event);
    }

    /// Recorded events in run order, for assertions and inspection.
    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Char-safe excerpt for log lines.
    pub fn preview(text: &str) -> String {
        if text.chars().count() <= PREVIEW_CHARS {
            text.to_string()
        } else {
            let cut: String = text.chars().take(PREVIEW_CHARS).collect();
            format!("{cut}...")
        }
    }

    /// Render the full run trace as a markdown document.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Highlighting Log");
        let _ = writeln!(out);
        let _ = writeln!(out, "**Timestamp:** {}", self.started);
        let _ = writeln!(out, "**Document:** {}", self.document_label);
        let _ = writeln!(out, "**Threshold:** {}", self.threshold);
        let _ = writeln!(out);

        let mut candidates_open = false;
        for event in &self.events {
            if candidates_open && !matches!(event, AuditEvent::CandidateExtracted { .. }) {
                let _ = writeln!(out);
                candidates_open = false;
            }
            match event {
                AuditEvent::RevisionTrackingDisabled => {
                    let _ = writeln!(out, "## Document Preparation");
                    let _ = writeln!(out, "- Track revisions disabled.");
                }
                AuditEvent::RevisionsAccepted => {
                    let _ = writeln!(out, "- All revisions accepted.");
                    let _ = writeln!(out);
                }
                AuditEvent::DocumentRead { chars } => {
                    let _ = writeln!(out, "## Document Text");
                    let _ = writeln!(out, "- Read {chars} characters.");
                    let _ = writeln!(out);
                    let _ = writeln!(out, "## Extracted Document Sentences");
                }
                AuditEvent::CandidateExtracted {
                    index,
                    preview,
                    len,
                } => {
                    let _ = writeln!(
                        out,
                        "- **Sentence {}:** `{preview}` (length: {len})",
                        index + 1
                    );
                    candidates_open = true;
                }
                AuditEvent::InputCounts { supplied, unique } => {
                    let _ = writeln!(out, "## Input Sentences");
                    let _ = writeln!(out, "- Supplied count: {supplied}");
                    if unique < supplied {
                        let _ =
                            writeln!(out, "- Unique count: {unique} (duplicates removed)");
                    } else {
                        let _ = writeln!(out, "- Unique count: {unique}");
                    }
                    let _ = writeln!(out);
                }
                AuditEvent::QueryStarted { index, raw } => {
                    let _ = writeln!(out, "## Processing Input Sentence {}", index + 1);
                    let _ = writeln!(out, "**Original:** `{}`", Self::preview(raw));
                    let _ = writeln!(out);
                }
                AuditEvent::QueryNormalized { normalized, len } => {
                    let _ = writeln!(
                        out,
                        "**Normalized:** `{}` (length: {len})",
                        Self::preview(normalized)
                    );
                    let _ = writeln!(out);
                }
                AuditEvent::FuzzyAccepted { best, score } => {
                    let _ = writeln!(out, "### Fuzzy Matching");
                    let _ = writeln!(out, "- Best match: `{}`", Self::preview(best));
                    let _ = writeln!(out, "- Score: {score}");
                    let _ = writeln!(out);
                }
                AuditEvent::FuzzyRejected { best_score } => {
                    let _ = writeln!(out, "### Fuzzy Matching");
                    let _ = writeln!(
                        out,
                        "- No match above threshold (best score: {best_score})"
                    );
                    let _ = writeln!(out);
                }
                AuditEvent::SearchAttempt {
                    attempt,
                    strategy,
                    needle,
                } => {
                    let _ = writeln!(out, "### Search Attempt {attempt}");
                    let _ = writeln!(
                        out,
                        "- {}: `{}`",
                        strategy.describe(),
                        Self::preview(needle)
                    );
                }
                AuditEvent::RangeCompared { found, matched } => {
                    let _ = writeln!(out, "- Extended range text: `{}`", Self::preview(found));
                    if *matched {
                        let _ = writeln!(out, "- **Match.**");
                    } else {
                        let _ = writeln!(out, "- **Mismatch.** Collapsing range and continuing.");
                    }
                }
                AuditEvent::Highlighted { range, color } => {
                    let _ = writeln!(
                        out,
                        "- **Highlighted** chars {}..{} with {}.",
                        range.start,
                        range.end,
                        color.engine_name()
                    );
                    let _ = writeln!(out);
                }
                AuditEvent::SearchExhausted { cause } => {
                    let _ = writeln!(out, "- No match: {}. Search complete.", cause.describe());
                    let _ = writeln!(out);
                }
                AuditEvent::EngineFailure { message } => {
                    let _ = writeln!(out, "## Engine Failure");
                    let _ = writeln!(out, "- {message}");
                    let _ = writeln!(out, "- Remaining sentences aborted.");
                    let _ = writeln!(out);
                }
            }
        }
        out
    }

    /// Truncate and write the rendered log. Write failures never become
    /// anchoring failures; they are reported via tracing only.
    pub fn write_to(&self, path: &Path) {
        if let Err(e) = std::fs::write(path, self.render_markdown()) {
            warn!("Failed to write audit log to {}: {}", path.display(), e);
        }
    }
}
