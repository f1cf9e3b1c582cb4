// WHY: the extraction collaborator is an LLM; its terminal JSON arrives
// embedded in free text with occasionally broken escapes, so parsing is
// tolerant by construction rather than by retry

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::highlight::HighlightColor;
use crate::highlighter::QuerySentence;

/// Terminal structured result of the extraction collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractionResult {
    #[serde(default)]
    pub user_stories: Vec<UserStory>,
}

/// One extracted user story and the document sentence it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStory {
    pub story: String,
    /// Approximately-quoted source sentence; becomes the query raw text
    #[serde(default)]
    pub source_sentence: String,
    /// Engine color name (e.g. `wdYellow`); absent means the default color
    #[serde(default)]
    pub color_name: Option<String>,
}

/// Parse a clean JSON extraction result.
pub fn parse_result(json: &str) -> Result<ExtractionResult> {
    serde_json::from_str(json).context("Failed to parse extraction result JSON")
}

/// Parse a raw LLM reply: sanitize invalid JSON escapes, isolate the
/// outermost JSON object, then parse it.
pub fn parse_reply(raw: &str) -> Result<ExtractionResult> {
    let sanitized = sanitize_json_escapes(raw);
    let block = isolate_json_object(&sanitized)
        .context("No JSON object found in extraction reply")?;
    debug!("Isolated {} bytes of JSON from extraction reply", block.len());
    parse_result(block)
}

/// Convert stories to query sentences, skipping stories without a source
/// sentence. Colors come from `color_name` with `default_color` as fallback
/// for absent names; unknown names fall back to yellow.
pub fn to_query_sentences(
    result: &ExtractionResult,
    default_color: HighlightColor,
) -> Vec<QuerySentence> {
    result
        .user_stories
        .iter()
        .filter(|story| !story.source_sentence.trim().is_empty())
        .map(|story| QuerySentence {
            raw: story.source_sentence.clone(),
            color: story
                .color_name
                .as_deref()
                .map(HighlightColor::from_engine_name)
                .unwrap_or(default_color),
        })
        .collect()
}

/// Double any backslash that does not start a valid JSON escape.
fn sanitize_json_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some(&next) if matches!(next, '\\' | '/' | '"' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') => {
                out.push('\\');
                out.push(next);
                chars.next();
            }
            _ => out.push_str("\\\\"),
        }
    }
    out
}

/// The outermost JSON object in the reply: from the first `{` that opens a
/// keyed object through the last `}`.
fn isolate_json_object(text: &str) -> Option<&str> {
    // WHY: anchoring on `{ "key":` skips stray braces in surrounding prose
    let opener = Regex::new(r#"\{\s*"[^"]+"\s*:"#).ok()?;
    let start = opener.find(text)?.start();
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
