//! Integration tests for alignment, ranking and diff projection

mod fixtures;

use cardmatch_core::{AlignmentOp, CellClass, ConfidenceTier, DiagnosticCode};
use cardmatch_engine::{align, edit_distance, project, rank, BatchRanker};
use fixtures::{crew_snapshot, generated_identities, large_snapshot, mixed_records};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// =============================================================================
// Alignment properties
// =============================================================================

#[test]
fn self_alignment_is_all_matches() {
    for s in generated_identities(200, 7) {
        let result = align(&s, &s);
        assert_eq!(result.distance, 0);
        assert!(result.alignment.iter().all(|op| matches!(op, AlignmentOp::Match(_))));
    }
}

#[test]
fn distance_is_symmetric_and_ops_mirror() {
    let corpus = generated_identities(60, 11);
    for a in &corpus {
        for b in &corpus {
            let forward = align(a, b);
            let backward = align(b, a);
            assert_eq!(forward.distance, backward.distance, "{:?} vs {:?}", a, b);

            // Both directions are valid alignments of the swapped inputs
            let mirrored = forward.alignment.mirrored();
            assert_eq!(mirrored.extracted_side(), *b);
            assert_eq!(mirrored.candidate_side(), *a);
            assert_eq!(mirrored.edit_count(), backward.distance);
        }
    }
}

#[test]
fn distance_is_bounded_by_lengths() {
    let corpus = generated_identities(60, 13);
    for a in &corpus {
        for b in &corpus {
            let (la, lb) = (a.chars().count(), b.chars().count());
            let d = edit_distance(a, b);
            assert!(d <= la.max(lb));
            assert!(d >= la.abs_diff(lb));
        }
    }
}

#[test]
fn triangle_inequality() {
    let corpus = generated_identities(25, 17);
    for a in &corpus {
        for b in &corpus {
            for c in &corpus {
                assert!(edit_distance(a, c) <= edit_distance(a, b) + edit_distance(b, c));
            }
        }
    }
}

#[test]
fn alignment_sides_reproduce_inputs() {
    let corpus = generated_identities(60, 19);
    for a in &corpus {
        for b in &corpus {
            let result = align(a, b);
            assert_eq!(result.alignment.extracted_side(), *a);
            assert_eq!(result.alignment.candidate_side(), *b);
        }
    }
}

#[test]
fn projection_rows_match_alignment_length() {
    let corpus = generated_identities(40, 23);
    for a in &corpus {
        for b in &corpus {
            let alignment = align(a, b).alignment;
            let rows = project(&alignment);
            assert_eq!(rows.extracted.len(), alignment.len());
            assert_eq!(rows.candidate.len(), alignment.len());
        }
    }
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn crew_exact_match_ranked_first() {
    let snapshot = crew_snapshot();
    let suggestions = rank(Some("A1234567"), snapshot.employees());

    let summary: Vec<_> = suggestions
        .iter()
        .map(|s| (s.candidate_id.as_str(), s.distance, s.tier))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("emp-001", 0, ConfidenceTier::High),
            ("emp-003", 1, ConfidenceTier::High),
        ]
    );
}

#[test]
fn below_floor_extracted_never_matches() {
    let snapshot = crew_snapshot();
    assert!(rank(Some("12"), snapshot.employees()).is_empty());
    assert!(rank(Some("X7"), snapshot.employees()).is_empty());
}

#[test]
fn suggestion_carries_everything_needed_for_a_diff() {
    let snapshot = crew_snapshot();
    let suggestions = rank(Some("P00123457"), snapshot.employees());
    let top = &suggestions[0];

    assert_eq!(top.candidate_id, "emp-004");
    assert_eq!(top.candidate_display_name, "Dev Rao");
    assert_eq!(top.distance, 1);

    let rows = project(&top.alignment);
    let (extracted, candidate) = rows.render_plain();
    assert_eq!(extracted, "P00123457");
    assert_eq!(candidate, "P00123456");

    let last = rows.columns().last().unwrap();
    assert_eq!(last.0.class, CellClass::SubstituteFrom);
    assert_eq!(last.1.class, CellClass::SubstituteTo);
}

#[test]
fn large_directory_is_capped_and_sorted() {
    let snapshot = large_snapshot(2_000);
    // More than five generated numbers sit within 3 edits of this one
    let suggestions = rank(Some("P0007919"), snapshot.employees());

    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[0].candidate_id, "emp-00001");
    assert_eq!(suggestions[0].distance, 0);
    for pair in suggestions.windows(2) {
        assert!(
            pair[0].distance < pair[1].distance
                || (pair[0].distance == pair[1].distance && pair[0].score >= pair[1].score)
        );
    }
}

// =============================================================================
// Batch
// =============================================================================

#[test]
fn batch_outcomes_per_card() {
    let batch = BatchRanker::new(crew_snapshot());
    let results = batch.rank_all(&mixed_records());

    let outcome: Vec<_> = results
        .iter()
        .map(|r| {
            let code = r.diagnostics.first().map(|d| d.code);
            (r.card_id.as_str(), r.ranked, r.suggestions.len(), code)
        })
        .collect();

    assert_eq!(
        outcome,
        vec![
            ("card-1", true, 2, None),
            ("card-2", true, 1, None),
            ("card-3", false, 0, Some(DiagnosticCode::ExtractionPending)),
            ("card-4", false, 0, Some(DiagnosticCode::ExtractionFailed)),
            ("card-5", false, 0, Some(DiagnosticCode::IdentityTooShort)),
            ("card-6", true, 0, Some(DiagnosticCode::NoQualifyingCandidate)),
            ("card-7", false, 0, Some(DiagnosticCode::IdentityMissing)),
        ]
    );
}

#[test]
fn batch_report_summary() {
    let batch = BatchRanker::new(crew_snapshot());
    let report = batch.build_report(batch.rank_all(&mixed_records()));

    assert_eq!(report.summary.cards_total, 7);
    assert_eq!(report.summary.cards_ranked, 3);
    assert_eq!(report.summary.cards_skipped, 4);
    assert_eq!(report.summary.cards_without_suggestion, 1);
    assert_eq!(report.summary.high, 3);
    assert_eq!(report.summary.errors, 1);

    // X7 in the snapshot is reported once, not per card
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].candidate_ids, vec!["emp-005"]);
}

#[tokio::test]
async fn concurrent_batch_preserves_order() {
    let batch = Arc::new(BatchRanker::new(crew_snapshot()));
    let records = mixed_records();

    let sequential = batch.rank_all(&records);
    let concurrent = Arc::clone(&batch)
        .rank_concurrent_with(records, 3)
        .await
        .unwrap();

    assert_eq!(sequential, concurrent);
}

#[test]
fn report_json_flattens_suggestions() {
    let batch = BatchRanker::new(crew_snapshot());
    let report = batch.build_report(batch.rank_all(&mixed_records()));
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["version"]["major"], 1);
    assert_eq!(json["summary"]["cards_total"], 7);

    let top = &json["cards"][0]["suggestions"][0];
    assert_eq!(top["candidate_id"], "emp-001");
    assert_eq!(top["tier"], "high");
    assert_eq!(top["distance"], 0);
    assert!(top["diff"]["extracted"].is_array());
}
