// WHY: the fuzzy gate only proves the sentence exists somewhere; the engine's
// find is literal, so prefix search plus extend-and-verify is what turns an
// approximate quote into an exact, highlightable span

use tracing::debug;

use crate::audit::{AuditEvent, AuditLog};
use crate::engine::{DocumentEngine, EngineError, Range};
use crate::normalize::normalize;

/// Queries longer than this are searched by prefix and verified after
/// extension (Case A).
pub const LONG_PREFIX_CHARS: usize = 250;

/// Direct-search queries longer than this get exactly one half-prefix
/// fallback when not found (Case B).
pub const FALLBACK_MIN_CHARS: usize = 100;

/// Which needle a search attempt used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Full query text (Case B)
    Direct,
    /// First 250 chars of a long query (Case A)
    LongPrefix,
    /// First half of a medium query after a direct miss (Case B fallback)
    HalfFallback,
}

impl SearchStrategy {
    pub fn describe(&self) -> &'static str {
        match self {
            SearchStrategy::Direct => "Direct search text",
            SearchStrategy::LongPrefix => "Using prefix for long sentence",
            SearchStrategy::HalfFallback => "Fallback: using half text",
        }
    }
}

/// Terminal failure cause of an anchor search.
///
/// The Case A prefix loop and the Case B single-shot fallback deliberately
/// fail differently; keeping distinct terminals makes that asymmetry visible
/// instead of folding it into one retry helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundCause {
    /// Case A: no further occurrence of the long prefix forward of the cursor
    PrefixExhausted,
    /// Case B: direct search missed and the query is too short for a fallback
    DirectNotFound,
    /// Case B: the half-prefix fallback itself was not found
    FallbackNotFound,
    /// Case B: the half-prefix was found but the extended text failed
    /// verification; no retry
    FallbackMismatch,
}

impl NotFoundCause {
    pub fn describe(&self) -> &'static str {
        match self {
            NotFoundCause::PrefixExhausted => "no further prefix occurrence",
            NotFoundCause::DirectNotFound => "direct search found nothing",
            NotFoundCause::FallbackNotFound => "fallback half text not found",
            NotFoundCause::FallbackMismatch => "fallback text failed verification",
        }
    }
}

/// Outcome of one query's anchor search. Never partial: either a verified
/// exact span or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOutcome {
    Anchored { range: Range, attempts: usize },
    NotFound { cause: NotFoundCause, attempts: usize },
}

/// Recover the exact span of `query_normalized` in the document through the
/// engine's forward find. The search cursor starts at the document beginning
/// and only ever moves forward within this call.
pub fn anchor<E: DocumentEngine>(
    engine: &mut E,
    audit: &mut AuditLog,
    query_normalized: &str,
) -> Result<AnchorOutcome, EngineError> {
    let total_chars = query_normalized.chars().count();
    let mut cursor = 0usize;
    let mut attempts = 0usize;

    if total_chars > LONG_PREFIX_CHARS {
        // Case A: prefix search, extend, verify; on mismatch move the cursor
        // past the tried range and search the prefix again
        let prefix = char_prefix(query_normalized, LONG_PREFIX_CHARS);
        loop {
            attempts += 1;
            audit.record(AuditEvent::SearchAttempt {
                attempt: attempts,
                strategy: SearchStrategy::LongPrefix,
                needle: AuditLog::preview(prefix),
            });

            let found = match engine.find_forward(cursor, prefix)? {
                Some(found) => found,
                None => {
                    let cause = NotFoundCause::PrefixExhausted;
                    audit.record(AuditEvent::SearchExhausted { cause });
                    debug!(attempts, "Long-prefix search exhausted");
                    return Ok(AnchorOutcome::NotFound { cause, attempts });
                }
            };

            let extended = engine.extend(found, total_chars - LONG_PREFIX_CHARS)?;
            let found_text = normalize(&engine.range_text(extended)?);
            let matched = found_text == query_normalized;
            audit.record(AuditEvent::RangeCompared {
                found: AuditLog::preview(&found_text),
                matched,
            });

            if matched {
                debug!(attempts, ?extended, "Long sentence anchored");
                return Ok(AnchorOutcome::Anchored {
                    range: extended,
                    attempts,
                });
            }
            cursor = extended.collapse_to_end() + 1;
        }
    }

    // Case B: one direct search for the full query
    attempts += 1;
    audit.record(AuditEvent::SearchAttempt {
        attempt: attempts,
        strategy: SearchStrategy::Direct,
        needle: AuditLog::preview(query_normalized),
    });

    if let Some(found) = engine.find_forward(cursor, query_normalized)? {
        debug!(attempts, ?found, "Sentence anchored directly");
        return Ok(AnchorOutcome::Anchored {
            range: found,
            attempts,
        });
    }

    if total_chars <= FALLBACK_MIN_CHARS {
        let cause = NotFoundCause::DirectNotFound;
        audit.record(AuditEvent::SearchExhausted { cause });
        return Ok(AnchorOutcome::NotFound { cause, attempts });
    }

    // Single fallback: first half of the query, extend, verify, no retry
    let half_chars = total_chars / 2;
    let half = char_prefix(query_normalized, half_chars);
    attempts += 1;
    audit.record(AuditEvent::SearchAttempt {
        attempt: attempts,
        strategy: SearchStrategy::HalfFallback,
        needle: AuditLog::preview(half),
    });

    let found = match engine.find_forward(cursor, half)? {
        Some(found) => found,
        None => {
            let cause = NotFoundCause::FallbackNotFound;
            audit.record(AuditEvent::SearchExhausted { cause });
            return Ok(AnchorOutcome::NotFound { cause, attempts });
        }
    };

    let extended = engine.extend(found, total_chars - half_chars)?;
    let found_text = normalize(&engine.range_text(extended)?);
    let matched = found_text == query_normalized;
    audit.record(AuditEvent::RangeCompared {
        found: AuditLog::preview(&found_text),
        matched,
    });

    if matched {
        debug!(attempts, ?extended, "Sentence anchored via fallback");
        Ok(AnchorOutcome::Anchored {
            range: extended,
            attempts,
        })
    } else {
        let cause = NotFoundCause::FallbackMismatch;
        audit.record(AuditEvent::SearchExhausted { cause });
        Ok(AnchorOutcome::NotFound { cause, attempts })
    }
}

/// First `n` chars of `s` as a slice.
fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
