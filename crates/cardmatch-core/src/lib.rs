//! Cardmatch Core
//!
//! Core domain model for identity resolution of scanned work cards.
//! Never rename diagnostic codes or serialized field names - they are part of the public API.

pub mod identity;
pub mod alignment;
pub mod tier;
pub mod suggestion;
pub mod extraction;
pub mod snapshot;
pub mod diagnostic;
pub mod report;
pub mod config;

pub use identity::{IdentityString, CandidateIdentity};
pub use alignment::{AlignmentOp, Alignment};
pub use tier::{ConfidenceTier, TierThreshold, TierTable};
pub use suggestion::{Suggestion, DisplayCell, CellClass, DiffRows};
pub use extraction::{ExtractionStatus, ExtractionRecord};
pub use snapshot::{EmployeeSnapshot, SnapshotVersion, SnapshotError};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use report::{Report, ReportVersion, ReportSummary, CardReport, ReportedSuggestion};
pub use config::{Config, ConfigError, MatchingConfig, DisplayConfig, CacheConfig};
