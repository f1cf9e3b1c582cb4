// WHY: one run is a strict sequential pipeline over the query list; the only
// run-fatal condition is the engine itself failing

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::anchor::{self, AnchorOutcome, NotFoundCause};
use crate::audit::{AuditEvent, AuditLog};
use crate::engine::{DocumentEngine, EngineError, Range};
use crate::highlight::HighlightColor;
use crate::matcher::{self, DEFAULT_THRESHOLD};
use crate::normalize::normalize;
use crate::split::SentenceSplitter;

/// One input sentence to anchor and highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySentence {
    /// Raw form as supplied by the extraction step
    pub raw: String,
    pub color: HighlightColor,
}

impl QuerySentence {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            color: HighlightColor::default(),
        }
    }

    pub fn with_color(raw: impl Into<String>, color: HighlightColor) -> Self {
        Self {
            raw: raw.into(),
            color,
        }
    }
}

/// Per-sentence result of a run. Never partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceOutcome {
    /// Exact span verified and highlighted
    Highlighted {
        range: Range,
        color: HighlightColor,
        attempts: usize,
    },
    /// Fuzzy score below threshold; the engine was never searched
    GateRejected { best_score: u8 },
    /// Engine searched but no exact verified span was recovered
    NotFound { cause: NotFoundCause },
}

/// Outcome of one whole highlighting run, in processed (first-seen) order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(String, SentenceOutcome)>,
}

impl RunSummary {
    pub fn highlighted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SentenceOutcome::Highlighted { .. }))
            .count()
    }

    pub fn gate_rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SentenceOutcome::GateRejected { .. }))
            .count()
    }

    pub fn not_found_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SentenceOutcome::NotFound { .. }))
            .count()
    }

    /// True when every processed sentence ended highlighted. An empty run is
    /// vacuously successful.
    pub fn all_highlighted(&self) -> bool {
        self.highlighted_count() == self.outcomes.len()
    }
}

/// Configuration for a highlighting run.
#[derive(Debug, Clone)]
pub struct HighlighterConfig {
    /// Minimum fuzzy score (0-100) before an anchor search is attempted
    pub threshold: u8,
    /// Color applied to queries that carry no color of their own
    pub default_color: HighlightColor,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            default_color: HighlightColor::default(),
        }
    }
}

/// Drives a full anchoring and highlighting run against one document engine.
pub struct Highlighter<E: DocumentEngine> {
    engine: E,
    config: HighlighterConfig,
    splitter: SentenceSplitter,
}

impl<E: DocumentEngine> Highlighter<E> {
    pub fn new(engine: E, config: HighlighterConfig) -> anyhow::Result<Self> {
        Ok(Self {
            engine,
            config,
            splitter: SentenceSplitter::new()?,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Run the pipeline: prepare the document, extract candidates, dedupe the
    /// queries, then anchor and highlight each query in order. Per-sentence
    /// failures continue the run; an [`EngineError`] aborts it, and highlights
    /// applied before the failure remain applied.
    pub fn run(
        &mut self,
        queries: &[QuerySentence],
        audit: &mut AuditLog,
    ) -> Result<RunSummary, EngineError> {
        if queries.is_empty() {
            // Nothing to do is a successful no-op
            info!("Empty query list, nothing to highlight");
            return Ok(RunSummary::default());
        }

        self.prepare_document(audit)?;

        // WHY: document text is read fresh every run; it may have changed
        // since the previous invocation
        let document_text = record_fatal(audit, self.engine.full_text())?;
        let document_normalized = normalize(&document_text);
        audit.record(AuditEvent::DocumentRead {
            chars: document_normalized.chars().count(),
        });

        let candidates = self.splitter.split(&document_normalized);
        for (index, candidate) in candidates.iter().enumerate() {
            audit.record(AuditEvent::CandidateExtracted {
                index,
                preview: AuditLog::preview(&candidate.text),
                len: candidate.text.chars().count(),
            });
        }

        let unique = dedupe(queries);
        audit.record(AuditEvent::InputCounts {
            supplied: queries.len(),
            unique: unique.len(),
        });
        if unique.len() < queries.len() {
            debug!(
                removed = queries.len() - unique.len(),
                "Removed duplicate query sentences"
            );
        }

        let mut summary = RunSummary::default();
        for (index, query) in unique.iter().enumerate() {
            info!(
                "Processing sentence {}/{}: {}",
                index + 1,
                unique.len(),
                AuditLog::preview(&query.raw)
            );
            audit.record(AuditEvent::QueryStarted {
                index,
                raw: query.raw.clone(),
            });

            let normalized = normalize(&query.raw);
            audit.record(AuditEvent::QueryNormalized {
                normalized: normalized.clone(),
                len: normalized.chars().count(),
            });

            // Fuzzy gate: clearly-unrelated text never reaches the engine
            let best = matcher::best_match(&normalized, &candidates);
            let accepted = match best {
                Some(b) if b.score >= self.config.threshold => {
                    audit.record(AuditEvent::FuzzyAccepted {
                        best: AuditLog::preview(&candidates[b.index].text),
                        score: b.score,
                    });
                    true
                }
                _ => {
                    let best_score = best.map_or(0, |b| b.score);
                    audit.record(AuditEvent::FuzzyRejected { best_score });
                    warn!(best_score, "Query rejected by fuzzy gate");
                    summary
                        .outcomes
                        .push((query.raw.clone(), SentenceOutcome::GateRejected { best_score }));
                    false
                }
            };
            if !accepted {
                continue;
            }

            let outcome = {
                let anchored = anchor::anchor(&mut self.engine, audit, &normalized);
                match record_fatal(audit, anchored)? {
                    AnchorOutcome::Anchored { range, attempts } => {
                        let applied = self.engine.set_highlight(range, query.color);
                        record_fatal(audit, applied)?;
                        audit.record(AuditEvent::Highlighted {
                            range,
                            color: query.color,
                        });
                        info!(?range, attempts, "Sentence highlighted");
                        SentenceOutcome::Highlighted {
                            range,
                            color: query.color,
                            attempts,
                        }
                    }
                    AnchorOutcome::NotFound { cause, .. } => {
                        warn!(?cause, "No verified span for sentence");
                        SentenceOutcome::NotFound { cause }
                    }
                }
            };
            summary.outcomes.push((query.raw.clone(), outcome));
        }

        info!(
            highlighted = summary.highlighted_count(),
            gate_rejected = summary.gate_rejected_count(),
            not_found = summary.not_found_count(),
            "Highlighting run complete"
        );
        Ok(summary)
    }

    /// Revision tracking off and pending revisions accepted before anchoring;
    /// a precondition side effect, not reversible here.
    fn prepare_document(&mut self, audit: &mut AuditLog) -> Result<(), EngineError> {
        record_fatal(audit, self.engine.disable_revision_tracking())?;
        audit.record(AuditEvent::RevisionTrackingDisabled);

        record_fatal(audit, self.engine.accept_all_revisions())?;
        audit.record(AuditEvent::RevisionsAccepted);
        Ok(())
    }
}

/// Record an engine failure in the audit trail before propagating it.
fn record_fatal<T>(
    audit: &mut AuditLog,
    result: Result<T, EngineError>,
) -> Result<T, EngineError> {
    if let Err(ref e) = result {
        audit.record(AuditEvent::EngineFailure {
            message: e.to_string(),
        });
    }
    result
}

/// Remove exact raw-text duplicates, preserving first-seen order.
fn dedupe(queries: &[QuerySentence]) -> Vec<QuerySentence> {
    let mut seen: HashSet<&str> = HashSet::new();
    queries
        .iter()
        .filter(|q| seen.insert(q.raw.as_str()))
        .cloned()
        .collect()
}
