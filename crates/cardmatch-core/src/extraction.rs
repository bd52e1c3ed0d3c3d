//! Extraction pipeline records

use serde::{Deserialize, Serialize};

/// Status reported by the OCR extraction pipeline for a work card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl ExtractionStatus {
    /// True once the pipeline has produced (possibly empty) output
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Done => write!(f, "DONE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Extraction output for one unassigned work card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Work card identifier
    pub card_id: String,

    pub status: ExtractionStatus,

    /// Passport/ID value read from the card, if any
    #[serde(default)]
    pub extracted_identity_string: Option<String>,

    /// Name read from the card, if any
    #[serde(default)]
    pub extracted_display_name: Option<String>,
}

impl ExtractionRecord {
    /// A finished extraction
    pub fn done(card_id: impl Into<String>, identity: Option<&str>) -> Self {
        Self {
            card_id: card_id.into(),
            status: ExtractionStatus::Done,
            extracted_identity_string: identity.map(str::to_string),
            extracted_display_name: None,
        }
    }

    /// Set the extracted display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.extracted_display_name = Some(name.into());
        self
    }

    /// Identity value that may be handed to the ranker.
    ///
    /// Only finished extractions with a non-empty value qualify.
    pub fn rankable_identity(&self) -> Option<&str> {
        if !self.status.is_done() {
            return None;
        }

        self.extracted_identity_string
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}
