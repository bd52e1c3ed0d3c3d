//! Suggestion report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Diagnostic, Severity};
use crate::suggestion::{DiffRows, Suggestion};
use crate::tier::ConfidenceTier;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A suggestion together with its projected diff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,

    pub diff: DiffRows,
}

/// Everything the batch produced for one work card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReport {
    pub card_id: String,

    /// Identity as extracted, before whitespace stripping
    pub extracted_identity: Option<String>,

    /// Whether the card was handed to the ranker at all
    pub ranked: bool,

    /// Best first, at most the configured maximum
    pub suggestions: Vec<ReportedSuggestion>,

    pub diagnostics: Vec<Diagnostic>,
}

impl CardReport {
    /// Tier of the top suggestion
    pub fn best_tier(&self) -> Option<ConfidenceTier> {
        self.suggestions.first().map(|s| s.suggestion.tier)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Cards in the batch
    pub cards_total: usize,

    /// Cards handed to the ranker
    pub cards_ranked: usize,

    /// Cards not ranked (extraction unfinished, missing or too-short identity)
    pub cards_skipped: usize,

    /// Ranked cards that got no suggestion
    pub cards_without_suggestion: usize,

    /// Suggestions emitted per tier
    pub high: usize,
    pub medium: usize,
    pub low: usize,

    /// Diagnostics by severity
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

/// Batch report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Fingerprint of the employee snapshot the cards were ranked against
    pub snapshot_version: String,

    pub summary: ReportSummary,

    pub cards: Vec<CardReport>,

    /// Diagnostics not tied to a single card
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Build a report and its summary from per-card results
    pub fn from_cards(
        snapshot_version: impl Into<String>,
        cards: Vec<CardReport>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let mut summary = ReportSummary {
            cards_total: cards.len(),
            ..ReportSummary::default()
        };

        for card in &cards {
            if card.ranked {
                summary.cards_ranked += 1;
                if card.suggestions.is_empty() {
                    summary.cards_without_suggestion += 1;
                }
            } else {
                summary.cards_skipped += 1;
            }

            for reported in &card.suggestions {
                match reported.suggestion.tier {
                    ConfidenceTier::High => summary.high += 1,
                    ConfidenceTier::Medium => summary.medium += 1,
                    ConfidenceTier::Low => summary.low += 1,
                }
            }
        }

        for diag in cards.iter().flat_map(|c| c.diagnostics.iter()).chain(diagnostics.iter()) {
            match diag.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warn => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
        }

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            snapshot_version: snapshot_version.into(),
            summary,
            cards,
            diagnostics,
        }
    }

    /// Check if any card could not be resolved automatically
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
