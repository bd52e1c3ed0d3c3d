//! Candidate ranking for one extracted identity
//!
//! Every comparable candidate is aligned against the extracted value, scored,
//! classified into a confidence tier and, if it qualifies, kept. Survivors are
//! ordered by distance (ascending) then score (descending) and truncated.
//!
//! Ranking never fails. An empty result means "no automatic suggestion" and
//! covers both a missing/too-short extracted value and a candidate set where
//! nobody reaches the Low tier.

use cardmatch_core::{
    CandidateIdentity, ConfidenceTier, Config, IdentityString, Suggestion, TierTable,
};
use cardmatch_core::config::DEFAULT_MAX_SUGGESTIONS;
use cardmatch_core::identity::MIN_IDENTITY_LEN;
use tracing::{debug, trace};
use crate::alignment::align_chars;

/// Normalized similarity: `1 - distance / max(len_a, len_b)`.
///
/// Two empty strings score 1.0.
pub fn normalized_score(distance: usize, len_a: usize, len_b: usize) -> f64 {
    let longest = len_a.max(len_b);
    if longest == 0 {
        return 1.0;
    }

    1.0 - distance.min(longest) as f64 / longest as f64
}

/// Ranks candidate identities against an extracted identity
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRanker {
    tiers: TierTable,
    min_identity_len: usize,
    max_suggestions: usize,
}

impl CandidateRanker {
    /// Ranker with the stock thresholds, floor and limit
    pub fn new() -> Self {
        Self {
            tiers: TierTable::default(),
            min_identity_len: MIN_IDENTITY_LEN,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Ranker configured from `cardmatch.toml`
    pub fn from_config(config: &Config) -> Self {
        Self {
            tiers: config.tiers,
            min_identity_len: config.matching.min_identity_len.max(MIN_IDENTITY_LEN),
            max_suggestions: config.matching.max_suggestions,
        }
    }

    /// Replace the tier thresholds
    pub fn with_tiers(mut self, tiers: TierTable) -> Self {
        self.tiers = tiers;
        self
    }

    /// Replace the suggestion limit
    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn min_identity_len(&self) -> usize {
        self.min_identity_len
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// Stable fingerprint of everything that shapes a ranking result.
    ///
    /// Two rankers share cached suggestions only when their keys are equal.
    pub fn settings_key(&self) -> String {
        let tiers: Vec<String> = ConfidenceTier::ALL
            .iter()
            .map(|tier| {
                let threshold = self.tiers.threshold(*tier);
                format!(
                    "{}:{}:{:016x}",
                    tier.as_str(),
                    threshold.max_distance,
                    threshold.min_score.to_bits()
                )
            })
            .collect();

        format!(
            "{};floor={};max={}",
            tiers.join(","),
            self.min_identity_len,
            self.max_suggestions
        )
    }

    /// Whether a raw extracted value would be compared at all
    pub fn accepts(&self, extracted: Option<&str>) -> bool {
        extracted
            .map(IdentityString::normalize)
            .is_some_and(|id| id.is_comparable(self.min_identity_len))
    }

    /// Rank `candidates` against `extracted`, best match first
    pub fn rank(
        &self,
        extracted: Option<&str>,
        candidates: &[CandidateIdentity],
    ) -> Vec<Suggestion> {
        let Some(extracted) = IdentityString::from_optional(extracted) else {
            return Vec::new();
        };

        if !extracted.is_comparable(self.min_identity_len) {
            debug!(
                extracted_len = extracted.char_len(),
                min_len = self.min_identity_len,
                "Extracted identity below comparison floor"
            );
            return Vec::new();
        }

        let extracted_chars = extracted.to_chars();
        let mut suggestions = Vec::new();

        for candidate in candidates {
            let canonical = candidate.normalized_identity();
            if !canonical.is_comparable(self.min_identity_len) {
                trace!(candidate_id = %candidate.id, "Skipping candidate with short identity");
                continue;
            }

            let canonical_chars = canonical.to_chars();
            let result = align_chars(&extracted_chars, &canonical_chars);
            let score =
                normalized_score(result.distance, extracted_chars.len(), canonical_chars.len());

            let Some(tier) = self.tiers.classify(result.distance, score) else {
                continue;
            };

            suggestions.push(Suggestion {
                candidate_id: candidate.id.clone(),
                candidate_display_name: candidate.display_name.clone(),
                distance: result.distance,
                score,
                tier,
                alignment: result.alignment,
            });
        }

        // Stable: equal distance and score keep snapshot order
        suggestions.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| b.score.total_cmp(&a.score))
        });
        suggestions.truncate(self.max_suggestions);

        debug!(
            candidates = candidates.len(),
            suggestions = suggestions.len(),
            best_distance = suggestions.first().map(|s| s.distance),
            "Ranked extracted identity"
        );

        suggestions
    }
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank with the stock configuration
pub fn rank(extracted: Option<&str>, candidates: &[CandidateIdentity]) -> Vec<Suggestion> {
    CandidateRanker::new().rank(extracted, candidates)
}
