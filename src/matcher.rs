// WHY: the fuzzy score only proves a sentence is somewhere in the document;
// it gates the engine search but never produces a highlightable span itself

use strsim::normalized_levenshtein;
use tracing::debug;

use crate::split::Candidate;

/// Default minimum similarity score before an anchor search is attempted.
pub const DEFAULT_THRESHOLD: u8 = 85;

/// Best-scoring candidate for a query, with a 0-100 similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch {
    /// Index into the candidate pool
    pub index: usize,
    pub score: u8,
}

/// Score every candidate against the normalized query and return the single
/// highest-scoring one. Ties keep the earliest candidate in document order.
/// Returns `None` only for an empty candidate pool.
pub fn best_match(query_normalized: &str, candidates: &[Candidate]) -> Option<BestMatch> {
    let mut best: Option<BestMatch> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = similarity(query_normalized, &candidate.text);
        if best.map_or(true, |b| score > b.score) {
            best = Some(BestMatch { index, score });
        }
    }

    if let Some(b) = best {
        debug!(
            index = b.index,
            score = b.score,
            "Best fuzzy candidate selected"
        );
    }
    best
}

/// Edit-distance similarity on the 0-100 scale used by the gate.
pub fn similarity(a: &str, b: &str) -> u8 {
    (normalized_levenshtein(a, b) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(texts: &[&str]) -> Vec<Candidate> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Candidate {
                text: t.to_string(),
                offset: i * 100,
            })
            .collect()
    }

    #[test]
    fn test_exact_match_scores_100() {
        let candidates = pool(&["Le client crée un compte.", "Autre chose."]);
        let best = best_match("Le client crée un compte.", &candidates).unwrap();
        assert_eq!(best.index, 0);
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_near_match_beats_unrelated() {
        let candidates = pool(&[
            "The weather is nice today.",
            "Users must be able to add products to their cart.",
        ]);
        let best = best_match("Users must be able to add products to their carts.", &candidates)
            .unwrap();
        assert_eq!(best.index, 1);
        assert!(best.score >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_unrelated_text_scores_below_threshold() {
        let candidates = pool(&["Le système doit permettre la création de comptes."]);
        let best = best_match("zzqqxx totally unrelated gibberish 12345", &candidates).unwrap();
        assert!(best.score < DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_empty_pool_returns_none() {
        assert!(best_match("anything", &[]).is_none());
    }

    #[test]
    fn test_tie_keeps_earliest_candidate() {
        let candidates = pool(&["same text.", "same text."]);
        let best = best_match("same text.", &candidates).unwrap();
        assert_eq!(best.index, 0);
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_empty_query_scores_zero_against_content() {
        let candidates = pool(&["Some sentence."]);
        let best = best_match("", &candidates).unwrap();
        assert_eq!(best.score, 0);
    }
}
