//! Confidence tiers and their thresholds

use serde::{Deserialize, Serialize};

/// How trustworthy a fuzzy identity match is
///
/// Variants are declared best-first, so `High < Medium < Low` under `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// All tiers in evaluation order
    pub const ALL: [ConfidenceTier; 3] = [Self::High, Self::Medium, Self::Low];

    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Both limits a match must satisfy to qualify for a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThreshold {
    /// Largest edit distance allowed
    pub max_distance: usize,

    /// Smallest normalized score allowed (0.0-1.0)
    pub min_score: f64,
}

impl TierThreshold {
    pub const fn new(max_distance: usize, min_score: f64) -> Self {
        Self { max_distance, min_score }
    }

    /// Whether a match with this distance and score qualifies
    pub fn admits(&self, distance: usize, score: f64) -> bool {
        distance <= self.max_distance && score >= self.min_score
    }

    /// True if `self` is at least as strict as `other` on both axes
    pub fn is_at_least_as_strict_as(&self, other: &TierThreshold) -> bool {
        self.max_distance <= other.max_distance && self.min_score >= other.min_score
    }
}

/// Thresholds for every tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    #[serde(default = "TierTable::default_high")]
    pub high: TierThreshold,

    #[serde(default = "TierTable::default_medium")]
    pub medium: TierThreshold,

    #[serde(default = "TierTable::default_low")]
    pub low: TierThreshold,
}

impl TierTable {
    fn default_high() -> TierThreshold {
        TierThreshold::new(1, 0.80)
    }

    fn default_medium() -> TierThreshold {
        TierThreshold::new(2, 0.65)
    }

    fn default_low() -> TierThreshold {
        TierThreshold::new(3, 0.50)
    }

    /// Threshold bound to a tier
    pub fn threshold(&self, tier: ConfidenceTier) -> &TierThreshold {
        match tier {
            ConfidenceTier::High => &self.high,
            ConfidenceTier::Medium => &self.medium,
            ConfidenceTier::Low => &self.low,
        }
    }

    /// First tier (High, then Medium, then Low) whose thresholds are both met.
    /// `None` means the match does not qualify at all.
    pub fn classify(&self, distance: usize, score: f64) -> Option<ConfidenceTier> {
        ConfidenceTier::ALL
            .into_iter()
            .find(|tier| self.threshold(*tier).admits(distance, score))
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            high: Self::default_high(),
            medium: Self::default_medium(),
            low: Self::default_low(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let table = TierTable::default();
        assert_eq!(table.high, TierThreshold::new(1, 0.80));
        assert_eq!(table.medium, TierThreshold::new(2, 0.65));
        assert_eq!(table.low, TierThreshold::new(3, 0.50));
    }

    #[test]
    fn classify_picks_first_satisfied_tier() {
        let table = TierTable::default();
        assert_eq!(table.classify(0, 1.0), Some(ConfidenceTier::High));
        assert_eq!(table.classify(1, 0.875), Some(ConfidenceTier::High));
        // distance fits High but score does not
        assert_eq!(table.classify(1, 0.75), Some(ConfidenceTier::Medium));
        assert_eq!(table.classify(2, 0.75), Some(ConfidenceTier::Medium));
        assert_eq!(table.classify(3, 0.625), Some(ConfidenceTier::Low));
        assert_eq!(table.classify(1, 0.5), Some(ConfidenceTier::Low));
    }

    #[test]
    fn classify_rejects_below_low() {
        let table = TierTable::default();
        assert_eq!(table.classify(4, 0.9), None);
        assert_eq!(table.classify(1, 0.4), None);
        assert_eq!(table.classify(8, 0.0), None);
    }

    #[test]
    fn boundary_scores_qualify() {
        let table = TierTable::default();
        // 1 edit over 5 chars and 3 edits over 6 chars land exactly on the limits
        assert_eq!(table.classify(1, 4.0 / 5.0), Some(ConfidenceTier::High));
        assert_eq!(table.classify(3, 3.0 / 6.0), Some(ConfidenceTier::Low));
    }

    #[test]
    fn tiers_order_best_first() {
        assert!(ConfidenceTier::High < ConfidenceTier::Medium);
        assert!(ConfidenceTier::Medium < ConfidenceTier::Low);
    }

    #[test]
    fn strictness() {
        let table = TierTable::default();
        assert!(table.high.is_at_least_as_strict_as(&table.medium));
        assert!(table.medium.is_at_least_as_strict_as(&table.low));
        assert!(!table.low.is_at_least_as_strict_as(&table.high));
    }
}
