use rapidfuzz::distance::levenshtein;

use crate::core::{Candidate, MatchResult};
use crate::ranking::normalize::{normalize, without_whitespace};

/// Minimum decayed score a fuzzy candidate must exceed
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Per-rank multiplicative penalty on fuzzy scores
pub const DEFAULT_POSITION_DECAY: f64 = 0.9;

/// Score given to titles equal to the query once spacing is ignored
pub const WHITESPACE_EQUIVALENT_SCORE: f64 = 0.9;

/// Edit-distance similarity of two canonical names (0.0 - 1.0).
///
/// Two empty names are identical; one empty name shares nothing with the other.
pub fn similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();

    match (len_a, len_b) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ => {
            let distance = levenshtein::distance(a.chars(), b.chars());
            1.0 - distance as f64 / len_a.max(len_b) as f64
        }
    }
}

/// Tiered best-match selection over a provider's ordered results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSelector {
    pub threshold: f64,
    pub position_decay: f64,
}

impl Default for MatchSelector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_POSITION_DECAY)
    }
}

impl MatchSelector {
    pub fn new(threshold: f64, position_decay: f64) -> Self {
        Self {
            threshold,
            position_decay,
        }
    }

    /// Decay factor applied to a candidate at `rank`; saturates for huge ranks
    fn rank_decay(&self, rank: usize) -> f64 {
        self.position_decay
            .powi(i32::try_from(rank).unwrap_or(i32::MAX))
    }

    /// Pick the single best candidate for `query`.
    ///
    /// Candidates are scanned in the order given; their position is their rank.
    /// An exact raw or canonical title match wins immediately with 1.0, a
    /// spacing-only difference wins immediately with 0.9, and otherwise the
    /// highest decayed fuzzy score above the threshold is kept (earlier rank
    /// wins ties).
    pub fn select(&self, query: &str, candidates: &[Candidate]) -> MatchResult {
        let lower_query = query.trim().to_lowercase();
        let normalized_query = normalize(query);
        let compact_query = without_whitespace(&normalized_query);

        let mut best: Option<(&Candidate, f64)> = None;

        for (rank, candidate) in candidates.iter().enumerate() {
            if candidate.title.trim().to_lowercase() == lower_query {
                tracing::debug!("Exact match for '{}' at rank {}: {}", query, rank, candidate.title);
                return MatchResult::found(candidate.clone(), 1.0);
            }

            let normalized_title = normalize(&candidate.title);
            if normalized_title == normalized_query {
                tracing::debug!("Canonical match for '{}' at rank {}: {}", query, rank, candidate.title);
                return MatchResult::found(candidate.clone(), 1.0);
            }

            let raw = similarity(&normalized_query, &normalized_title);
            let score = raw * self.rank_decay(rank);

            tracing::trace!(
                "'{}' vs '{}' (rank {}): raw {:.4}, score {:.4}",
                normalized_query,
                normalized_title,
                rank,
                raw,
                score
            );

            if without_whitespace(&normalized_title) == compact_query {
                tracing::debug!("Spacing-only match for '{}' at rank {}: {}", query, rank, candidate.title);
                return MatchResult::found(candidate.clone(), WHITESPACE_EQUIVALENT_SCORE);
            }

            let beats_best = best.map_or(true, |(_, best_score)| score > best_score);
            if score > self.threshold && beats_best {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) => {
                tracing::debug!("Fuzzy match for '{}': {} ({:.3})", query, candidate.title, score);
                MatchResult::found(candidate.clone(), score)
            }
            None => {
                tracing::debug!("No candidate for '{}' above {}", query, self.threshold);
                MatchResult::not_found()
            }
        }
    }
}

/// Select the best match with the default threshold and position decay
pub fn select_best_match(query: &str, candidates: &[Candidate]) -> MatchResult {
    MatchSelector::default().select(query, candidates)
}
