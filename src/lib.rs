pub mod anchor;
pub mod audit;
pub mod engine;
pub mod extraction;
pub mod highlight;
pub mod highlighter;
pub mod matcher;
pub mod normalize;
pub mod split;

// Re-export main types for convenient access
pub use engine::{AppliedHighlight, DocumentEngine, EngineError, PlainTextEngine, Range};
pub use highlight::HighlightColor;
pub use highlighter::{
    Highlighter, HighlighterConfig, QuerySentence, RunSummary, SentenceOutcome,
};

// Re-export the per-query search vocabulary for callers inspecting outcomes
pub use anchor::{AnchorOutcome, NotFoundCause, SearchStrategy};
pub use audit::{AuditEvent, AuditLog};
