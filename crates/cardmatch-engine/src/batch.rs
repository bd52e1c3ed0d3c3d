//! Batch ranking of unassigned work cards against one employee snapshot
//!
//! Each card is ranked independently, so a batch can be fanned out across
//! blocking worker tasks. Results always come back in input order and match
//! the sequential path exactly.

use cardmatch_core::{
    CardReport, Config, Diagnostic, DiagnosticCode, EmployeeSnapshot, ExtractionRecord,
    ExtractionStatus, Report, ReportedSuggestion, SnapshotVersion, Suggestion,
};
use cardmatch_core::config::DEFAULT_GAP_GLYPH;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};
use crate::memo::{MemoKey, SuggestionCache};
use crate::projection::project_with_gap;
use crate::ranker::CandidateRanker;

/// Outcome for one work card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardResult {
    pub card_id: String,

    /// Identity as extracted, before whitespace stripping
    pub extracted_identity: Option<String>,

    /// Whether the card reached the ranker
    pub ranked: bool,

    /// Best first
    pub suggestions: Vec<Suggestion>,

    pub diagnostics: Vec<Diagnostic>,
}

impl CardResult {
    fn skipped(record: &ExtractionRecord, diagnostic: Diagnostic) -> Self {
        Self {
            card_id: record.card_id.clone(),
            extracted_identity: record.extracted_identity_string.clone(),
            ranked: false,
            suggestions: Vec::new(),
            diagnostics: vec![diagnostic.with_card(record.card_id.clone())],
        }
    }

    /// Attach projected diff rows to every suggestion
    pub fn into_card_report(self, gap: char) -> CardReport {
        let suggestions = self
            .suggestions
            .into_iter()
            .map(|suggestion| {
                let diff = project_with_gap(&suggestion.alignment, gap);
                ReportedSuggestion { suggestion, diff }
            })
            .collect();

        CardReport {
            card_id: self.card_id,
            extracted_identity: self.extracted_identity,
            ranked: self.ranked,
            suggestions,
            diagnostics: self.diagnostics,
        }
    }
}

/// Batch errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Ranking worker failed: {0}")]
    WorkerFailed(String),
}

/// Ranks many cards against a shared snapshot
#[derive(Debug)]
pub struct BatchRanker {
    ranker: CandidateRanker,
    snapshot: Arc<EmployeeSnapshot>,
    version: SnapshotVersion,
    cache: Option<SuggestionCache>,
    gap_glyph: char,
}

impl BatchRanker {
    /// Batch ranker with the stock configuration and no cache
    pub fn new(snapshot: EmployeeSnapshot) -> Self {
        let version = snapshot.version();
        Self {
            ranker: CandidateRanker::new(),
            snapshot: Arc::new(snapshot),
            version,
            cache: None,
            gap_glyph: DEFAULT_GAP_GLYPH,
        }
    }

    /// Batch ranker configured from `cardmatch.toml`; builds a cache when enabled
    pub fn from_config(config: &Config, snapshot: EmployeeSnapshot) -> Self {
        let cache = config
            .cache
            .enabled()
            .then(|| SuggestionCache::new(config.cache.ttl()));

        Self {
            ranker: CandidateRanker::from_config(config),
            cache,
            gap_glyph: config.display.gap_glyph,
            ..Self::new(snapshot)
        }
    }

    /// Use an existing cache, possibly shared with differently configured rankers
    pub fn with_cache(mut self, cache: SuggestionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn snapshot(&self) -> &EmployeeSnapshot {
        &self.snapshot
    }

    pub fn snapshot_version(&self) -> &SnapshotVersion {
        &self.version
    }

    pub fn ranker(&self) -> &CandidateRanker {
        &self.ranker
    }

    /// Rank a single card, honoring its extraction status
    pub fn rank_card(&self, record: &ExtractionRecord) -> CardResult {
        match record.status {
            ExtractionStatus::Pending | ExtractionStatus::Running => {
                return CardResult::skipped(
                    record,
                    Diagnostic::new(
                        DiagnosticCode::ExtractionPending,
                        format!("Extraction is {}; card not ranked yet", record.status),
                    ),
                );
            }
            ExtractionStatus::Failed => {
                return CardResult::skipped(
                    record,
                    Diagnostic::new(
                        DiagnosticCode::ExtractionFailed,
                        "Extraction failed; identify the employee manually",
                    ),
                );
            }
            ExtractionStatus::Done => {}
        }

        let Some(extracted) = record.rankable_identity() else {
            return CardResult::skipped(
                record,
                Diagnostic::new(
                    DiagnosticCode::IdentityMissing,
                    "No identity number was extracted from the card",
                ),
            );
        };

        if !self.ranker.accepts(Some(extracted)) {
            return CardResult::skipped(
                record,
                Diagnostic::new(
                    DiagnosticCode::IdentityTooShort,
                    format!(
                        "Extracted identity '{}' is shorter than {} characters",
                        extracted,
                        self.ranker.min_identity_len()
                    ),
                ),
            );
        }

        let suggestions = self.suggestions_for(extracted);
        let mut diagnostics = Vec::new();

        if suggestions.is_empty() {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::NoQualifyingCandidate,
                    format!("No employee is close enough to '{}'; search manually", extracted),
                )
                .with_card(record.card_id.clone()),
            );
        } else if let Some(tied) = top_ties(&suggestions) {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::AmbiguousTopMatch,
                    format!(
                        "{} employees tie for the best match at distance {}",
                        tied.len(),
                        suggestions[0].distance
                    ),
                )
                .with_card(record.card_id.clone())
                .with_candidates(tied),
            );
        }

        debug!(card_id = %record.card_id, suggestions = suggestions.len(), "Ranked card");

        CardResult {
            card_id: record.card_id.clone(),
            extracted_identity: record.extracted_identity_string.clone(),
            ranked: true,
            suggestions,
            diagnostics,
        }
    }

    fn suggestions_for(&self, extracted: &str) -> Vec<Suggestion> {
        let compute = || self.ranker.rank(Some(extracted), self.snapshot.employees());

        match &self.cache {
            Some(cache) => {
                let key = MemoKey::new(extracted, &self.version, &self.ranker);
                cache.get_or_insert_with(key, compute).as_ref().clone()
            }
            None => compute(),
        }
    }

    /// Rank every card sequentially, in input order
    pub fn rank_all(&self, records: &[ExtractionRecord]) -> Vec<CardResult> {
        info!(
            cards = records.len(),
            employees = self.snapshot.len(),
            snapshot = self.version.short(),
            "Ranking batch"
        );
        self.evict_expired();

        records.iter().map(|record| self.rank_card(record)).collect()
    }

    /// Rank every card across blocking worker tasks.
    ///
    /// Output order and content are identical to [`BatchRanker::rank_all`].
    pub async fn rank_concurrent(
        self: Arc<Self>,
        records: Vec<ExtractionRecord>,
    ) -> Result<Vec<CardResult>, BatchError> {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.rank_concurrent_with(records, workers).await
    }

    /// [`BatchRanker::rank_concurrent`] with an explicit worker count
    pub async fn rank_concurrent_with(
        self: Arc<Self>,
        records: Vec<ExtractionRecord>,
        workers: usize,
    ) -> Result<Vec<CardResult>, BatchError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = records.len().div_ceil(workers.max(1));

        info!(
            cards = records.len(),
            employees = self.snapshot.len(),
            snapshot = self.version.short(),
            chunk_size,
            "Ranking batch concurrently"
        );
        self.evict_expired();

        let mut tasks = JoinSet::new();
        for (index, chunk) in records.chunks(chunk_size).enumerate() {
            let chunk = chunk.to_vec();
            let batch = Arc::clone(&self);
            tasks.spawn_blocking(move || {
                let results: Vec<CardResult> = chunk.iter().map(|r| batch.rank_card(r)).collect();
                (index, results)
            });
        }

        let mut chunks = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let chunk = joined.map_err(|e| BatchError::WorkerFailed(e.to_string()))?;
            chunks.push(chunk);
        }

        chunks.sort_by_key(|(index, _)| *index);
        Ok(chunks.into_iter().flat_map(|(_, results)| results).collect())
    }

    fn evict_expired(&self) {
        if let Some(cache) = &self.cache {
            cache.evict_expired();
        }
    }

    /// Notes about the snapshot itself, independent of any card
    pub fn snapshot_diagnostics(&self) -> Vec<Diagnostic> {
        let unusable: Vec<String> = self
            .snapshot
            .uncomparable(self.ranker.min_identity_len())
            .map(|e| e.id.clone())
            .collect();

        if unusable.is_empty() {
            return Vec::new();
        }

        vec![Diagnostic::new(
            DiagnosticCode::CandidateIdentityTooShort,
            format!(
                "{} employee(s) have an identity under {} characters; never suggested",
                unusable.len(),
                self.ranker.min_identity_len()
            ),
        )
        .with_candidates(unusable)]
    }

    /// Assemble the versioned report for a finished batch
    pub fn build_report(&self, results: Vec<CardResult>) -> Report {
        let cards = results
            .into_iter()
            .map(|result| result.into_card_report(self.gap_glyph))
            .collect();

        Report::from_cards(self.version.as_str(), cards, self.snapshot_diagnostics())
    }
}

/// Ids of every suggestion tied with the first on distance and score,
/// when there is more than one
fn top_ties(suggestions: &[Suggestion]) -> Option<Vec<String>> {
    let best = suggestions.first()?;
    let tied: Vec<String> = suggestions
        .iter()
        .take_while(|s| s.distance == best.distance && s.score == best.score)
        .map(|s| s.candidate_id.clone())
        .collect();

    (tied.len() > 1).then_some(tied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardmatch_core::{CandidateIdentity, ConfidenceTier, Severity};
    use std::time::Duration;

    fn snapshot() -> EmployeeSnapshot {
        EmployeeSnapshot::new(vec![
            CandidateIdentity::new("e1", "Ana Lima", "A1234567"),
            CandidateIdentity::new("e2", "Bo Chen", "B9999999"),
            CandidateIdentity::new("e3", "Cy Park", "A1234568"),
            CandidateIdentity::new("e4", "Di Wong", "X1"),
        ])
        .unwrap()
    }

    fn pending(card_id: &str) -> ExtractionRecord {
        ExtractionRecord {
            card_id: card_id.to_string(),
            status: ExtractionStatus::Pending,
            extracted_identity_string: None,
            extracted_display_name: None,
        }
    }

    fn codes(result: &CardResult) -> Vec<DiagnosticCode> {
        result.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn done_card_is_ranked() {
        let batch = BatchRanker::new(snapshot());
        let result = batch.rank_card(&ExtractionRecord::done("c1", Some("A1234567")));

        assert!(result.ranked);
        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(result.suggestions[0].candidate_id, "e1");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unfinished_and_failed_cards_are_not_ranked() {
        let batch = BatchRanker::new(snapshot());

        let result = batch.rank_card(&pending("c1"));
        assert!(!result.ranked);
        assert_eq!(codes(&result), vec![DiagnosticCode::ExtractionPending]);

        let mut failed = ExtractionRecord::done("c2", Some("A1234567"));
        failed.status = ExtractionStatus::Failed;
        let result = batch.rank_card(&failed);
        assert!(!result.ranked);
        assert!(result.suggestions.is_empty());
        assert_eq!(codes(&result), vec![DiagnosticCode::ExtractionFailed]);
        assert_eq!(result.diagnostics[0].severity, Severity::Error);
        assert_eq!(result.diagnostics[0].card_id.as_deref(), Some("c2"));
    }

    #[test]
    fn missing_and_short_identities() {
        let batch = BatchRanker::new(snapshot());

        let result = batch.rank_card(&ExtractionRecord::done("c1", None));
        assert_eq!(codes(&result), vec![DiagnosticCode::IdentityMissing]);

        let result = batch.rank_card(&ExtractionRecord::done("c2", Some("12")));
        assert!(!result.ranked);
        assert_eq!(codes(&result), vec![DiagnosticCode::IdentityTooShort]);
    }

    #[test]
    fn no_qualifying_candidate() {
        let batch = BatchRanker::new(snapshot());
        let result = batch.rank_card(&ExtractionRecord::done("c1", Some("ZZZZZZZZ")));
        assert!(result.ranked);
        assert!(result.suggestions.is_empty());
        assert_eq!(codes(&result), vec![DiagnosticCode::NoQualifyingCandidate]);
    }

    #[test]
    fn ambiguous_top_match_lists_tied_employees() {
        let batch = BatchRanker::new(snapshot());
        // one substitution away from both A1234567 and A1234568
        let result = batch.rank_card(&ExtractionRecord::done("c1", Some("A1234569")));

        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(codes(&result), vec![DiagnosticCode::AmbiguousTopMatch]);
        assert_eq!(result.diagnostics[0].candidate_ids, vec!["e1", "e3"]);
    }

    #[test]
    fn cache_is_used_and_transparent() {
        let cache = SuggestionCache::new(Duration::from_secs(60));
        let batch = BatchRanker::new(snapshot()).with_cache(cache.clone());

        let first = batch.rank_card(&ExtractionRecord::done("c1", Some("A1234567")));
        let second = batch.rank_card(&ExtractionRecord::done("c2", Some("A 1234 567")));

        assert_eq!(cache.len(), 1);
        assert_eq!(first.suggestions, second.suggestions);
    }

    #[test]
    fn snapshot_diagnostics_flag_short_identities() {
        let batch = BatchRanker::new(snapshot());
        let diagnostics = batch.snapshot_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::CandidateIdentityTooShort);
        assert_eq!(diagnostics[0].candidate_ids, vec!["e4"]);
    }

    #[test]
    fn report_includes_projected_rows() {
        let batch = BatchRanker::new(snapshot());
        let results = batch.rank_all(&[
            ExtractionRecord::done("c1", Some("A1234567")),
            pending("c2"),
        ]);

        let report = batch.build_report(results);
        assert_eq!(report.summary.cards_total, 2);
        assert_eq!(report.summary.cards_ranked, 1);
        assert_eq!(report.summary.cards_skipped, 1);
        assert_eq!(report.summary.high, 2);
        assert_eq!(report.snapshot_version, batch.snapshot_version().as_str());
        assert_eq!(report.diagnostics.len(), 1);

        let top = &report.cards[0].suggestions[1];
        assert_eq!(top.suggestion.tier, ConfidenceTier::High);
        assert_eq!(top.diff.render_plain(), ("A1234567".to_string(), "A1234568".to_string()));
    }

    #[test]
    fn shared_cache_respects_each_rankers_settings() {
        let cache = SuggestionCache::new(Duration::from_secs(60));
        let wide = BatchRanker::new(snapshot()).with_cache(cache.clone());
        let mut config = Config::default();
        config.matching.max_suggestions = 1;
        let narrow = BatchRanker::from_config(&config, snapshot()).with_cache(cache.clone());

        let card = ExtractionRecord::done("c1", Some("A1234569"));
        assert_eq!(wide.rank_card(&card).suggestions.len(), 2);
        assert_eq!(narrow.rank_card(&card).suggestions.len(), 1);
        assert_eq!(wide.rank_card(&card).suggestions.len(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn batch_start_drops_expired_entries() {
        let cache = SuggestionCache::new(Duration::from_millis(100));
        let batch = BatchRanker::new(snapshot()).with_cache(cache.clone());

        batch.rank_all(&[
            ExtractionRecord::done("c1", Some("A1234567")),
            ExtractionRecord::done("c2", Some("B9999999")),
        ]);
        assert_eq!(cache.len(), 2);

        std::thread::sleep(Duration::from_millis(150));
        batch.rank_all(&[ExtractionRecord::done("c3", Some("A1234568"))]);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_matches_sequential() {
        let batch = Arc::new(BatchRanker::new(snapshot()));
        let records: Vec<_> = (0..23)
            .map(|i| match i % 4 {
                0 => ExtractionRecord::done(format!("c{}", i), Some("A1234567")),
                1 => ExtractionRecord::done(format!("c{}", i), Some("A1234569")),
                2 => pending(&format!("c{}", i)),
                _ => ExtractionRecord::done(format!("c{}", i), Some("B999 9990")),
            })
            .collect();

        let sequential = batch.rank_all(&records);
        let concurrent = Arc::clone(&batch)
            .rank_concurrent_with(records, 4)
            .await
            .unwrap();

        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn concurrent_empty_batch() {
        let batch = Arc::new(BatchRanker::new(snapshot()));
        assert!(batch.rank_concurrent(Vec::new()).await.unwrap().is_empty());
    }
}
