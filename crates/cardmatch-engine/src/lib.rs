//! Cardmatch engine - identity resolution for work cards
//!
//! This crate implements the matching logic:
//! - Alignment engine (edit distance with operation backtrace)
//! - Candidate ranker (scoring, confidence tiers, top-K)
//! - Diff projection (aligned display rows)
//! - Batch ranking and suggestion memoization

pub mod alignment;
pub mod ranker;
pub mod projection;
pub mod memo;
pub mod batch;

pub use alignment::{align, edit_distance, AlignmentResult, DistanceTable};
pub use ranker::{rank, normalized_score, CandidateRanker};
pub use projection::{project, project_with_gap};
pub use memo::{MemoKey, SuggestionCache};
pub use batch::{BatchRanker, BatchError, CardResult};
