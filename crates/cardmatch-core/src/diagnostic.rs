//! Card outcome codes
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - review tooling keys off them.
//! Add new codes with new names only.
//!
//! None of these are errors in the Rust sense. They explain why a card got
//! the suggestions it got (or none at all).

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Extraction state (1xxx)
    /// Extraction is still pending or running; the card was not ranked
    ExtractionPending,

    /// Extraction failed; the card needs manual identification
    ExtractionFailed,

    // Extracted identity (2xxx)
    /// Extraction finished without an identity value
    IdentityMissing,

    /// Extracted identity is below the comparison floor
    IdentityTooShort,

    // Ranking (3xxx)
    /// No candidate qualified for any confidence tier
    NoQualifyingCandidate,

    /// Several suggestions tie for best distance and score
    AmbiguousTopMatch,

    // Snapshot (4xxx)
    /// A directory entry's identity is too short to ever be compared
    CandidateIdentityTooShort,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractionPending => "EXTRACTION_PENDING",
            Self::ExtractionFailed => "EXTRACTION_FAILED",
            Self::IdentityMissing => "IDENTITY_MISSING",
            Self::IdentityTooShort => "IDENTITY_TOO_SHORT",
            Self::NoQualifyingCandidate => "NO_QUALIFYING_CANDIDATE",
            Self::AmbiguousTopMatch => "AMBIGUOUS_TOP_MATCH",
            Self::CandidateIdentityTooShort => "CANDIDATE_IDENTITY_TOO_SHORT",
        }
    }

    /// Severity a code is reported with
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::ExtractionPending => Severity::Info,
            Self::ExtractionFailed => Severity::Error,
            Self::IdentityMissing | Self::IdentityTooShort => Severity::Warn,
            Self::NoQualifyingCandidate => Severity::Warn,
            Self::AmbiguousTopMatch => Severity::Warn,
            Self::CandidateIdentityTooShort => Severity::Info,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Needs an operator's attention
    Warn,

    /// The card cannot be resolved automatically
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Work card the diagnostic is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,

    /// Employees involved (tied candidates, unusable directory entries)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidate_ids: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            card_id: None,
            candidate_ids: Vec::new(),
        }
    }

    /// Override the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach the work card
    pub fn with_card(mut self, card_id: impl Into<String>) -> Self {
        self.card_id = Some(card_id.into());
        self
    }

    /// Attach the employees involved
    pub fn with_candidates(mut self, candidate_ids: Vec<String>) -> Self {
        self.candidate_ids = candidate_ids;
        self
    }
}
