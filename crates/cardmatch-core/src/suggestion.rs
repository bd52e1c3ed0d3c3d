//! Ranking output and diff display types

use serde::{Deserialize, Serialize};
use crate::alignment::Alignment;
use crate::tier::ConfidenceTier;

/// One ranked, tier-classified candidate for a work card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Employee identifier from the directory
    pub candidate_id: String,

    /// Employee name shown on the suggestion badge
    pub candidate_display_name: String,

    /// Edit distance between extracted and canonical identity
    pub distance: usize,

    /// Normalized similarity in [0, 1], 1 meaning identical
    pub score: f64,

    /// Confidence tier
    pub tier: ConfidenceTier,

    /// Full alignment, extracted side first
    pub alignment: Alignment,
}

/// Classification tag of a rendered diff cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellClass {
    Match,
    SubstituteFrom,
    SubstituteTo,
    Delete,
    Insert,
    Gap,
}

impl CellClass {
    /// Stable tag used by view layers (CSS class names and the like)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::SubstituteFrom => "substitute-from",
            Self::SubstituteTo => "substitute-to",
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Gap => "gap",
        }
    }
}

impl std::fmt::Display for CellClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One character position of a diff row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCell {
    pub ch: char,
    pub class: CellClass,
}

impl DisplayCell {
    pub fn new(ch: char, class: CellClass) -> Self {
        Self { ch, class }
    }
}

/// Two vertically aligned rows: extracted on top, candidate below
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffRows {
    pub extracted: Vec<DisplayCell>,
    pub candidate: Vec<DisplayCell>,
}

impl DiffRows {
    /// Number of columns (both rows have the same width)
    pub fn width(&self) -> usize {
        self.extracted.len()
    }

    /// Render both rows as plain text, one line each
    pub fn render_plain(&self) -> (String, String) {
        (
            self.extracted.iter().map(|cell| cell.ch).collect(),
            self.candidate.iter().map(|cell| cell.ch).collect(),
        )
    }

    /// Iterate over column pairs
    pub fn columns(&self) -> impl Iterator<Item = (&DisplayCell, &DisplayCell)> {
        self.extracted.iter().zip(self.candidate.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_class_tags() {
        assert_eq!(CellClass::SubstituteFrom.as_str(), "substitute-from");
        assert_eq!(
            serde_json::to_string(&CellClass::SubstituteTo).unwrap(),
            "\"substitute-to\""
        );
    }

    #[test]
    fn render_plain_rows() {
        let rows = DiffRows {
            extracted: vec![
                DisplayCell::new('A', CellClass::Match),
                DisplayCell::new('·', CellClass::Gap),
            ],
            candidate: vec![
                DisplayCell::new('A', CellClass::Match),
                DisplayCell::new('7', CellClass::Insert),
            ],
        };

        assert_eq!(rows.width(), 2);
        assert_eq!(rows.render_plain(), ("A·".to_string(), "A7".to_string()));
    }
}
