//! Character alignment operations
//!
//! An alignment describes how an extracted identity lines up against a
//! candidate identity. "Extracted" is always the left-hand side.

use serde::{Deserialize, Serialize};

/// One step of an alignment between an extracted and a candidate string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentOp {
    /// Same character on both sides
    Match(char),

    /// Extracted character `.0` stands where the candidate has `.1`
    Substitute(char, char),

    /// Present in the extracted string, absent from the candidate
    Delete(char),

    /// Absent from the extracted string, present in the candidate
    Insert(char),
}

impl AlignmentOp {
    /// Character this op contributes to the extracted side, if any
    pub fn extracted_char(&self) -> Option<char> {
        match *self {
            Self::Match(c) | Self::Delete(c) => Some(c),
            Self::Substitute(from, _) => Some(from),
            Self::Insert(_) => None,
        }
    }

    /// Character this op contributes to the candidate side, if any
    pub fn candidate_char(&self) -> Option<char> {
        match *self {
            Self::Match(c) | Self::Insert(c) => Some(c),
            Self::Substitute(_, to) => Some(to),
            Self::Delete(_) => None,
        }
    }

    /// Whether this op costs one edit
    pub fn is_edit(&self) -> bool {
        !matches!(self, Self::Match(_))
    }

    /// The same op seen from the other side (extracted and candidate swapped)
    pub fn mirrored(&self) -> Self {
        match *self {
            Self::Match(c) => Self::Match(c),
            Self::Substitute(from, to) => Self::Substitute(to, from),
            Self::Delete(c) => Self::Insert(c),
            Self::Insert(c) => Self::Delete(c),
        }
    }
}

/// Ordered alignment, read left to right in original string order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alignment(Vec<AlignmentOp>);

impl Alignment {
    /// Wrap ops that are already in left-to-right order
    pub fn from_ops(ops: Vec<AlignmentOp>) -> Self {
        Self(ops)
    }

    /// The ops in order
    pub fn ops(&self) -> &[AlignmentOp] {
        &self.0
    }

    /// Number of ops
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the alignment of two empty strings
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the ops
    pub fn iter(&self) -> std::slice::Iter<'_, AlignmentOp> {
        self.0.iter()
    }

    /// Number of non-match ops; equals the edit distance for a minimal alignment
    pub fn edit_count(&self) -> usize {
        self.0.iter().filter(|op| op.is_edit()).count()
    }

    /// Reconstruct the extracted string
    pub fn extracted_side(&self) -> String {
        self.0.iter().filter_map(AlignmentOp::extracted_char).collect()
    }

    /// Reconstruct the candidate string
    pub fn candidate_side(&self) -> String {
        self.0.iter().filter_map(AlignmentOp::candidate_char).collect()
    }

    /// The alignment with extracted and candidate roles swapped
    pub fn mirrored(&self) -> Self {
        Self(self.0.iter().map(AlignmentOp::mirrored).collect())
    }
}

impl<'a> IntoIterator for &'a Alignment {
    type Item = &'a AlignmentOp;
    type IntoIter = std::slice::Iter<'a, AlignmentOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
