//! Diff projection: alignment ops to two aligned display rows

use cardmatch_core::config::DEFAULT_GAP_GLYPH;
use cardmatch_core::{Alignment, AlignmentOp, CellClass, DiffRows, DisplayCell};

/// Project an alignment using the default gap glyph
pub fn project(alignment: &Alignment) -> DiffRows {
    project_with_gap(alignment, DEFAULT_GAP_GLYPH)
}

/// Project an alignment into extracted/candidate rows.
///
/// Each op yields exactly one cell per row, so both rows are as long as the
/// alignment.
pub fn project_with_gap(alignment: &Alignment, gap: char) -> DiffRows {
    let mut extracted = Vec::with_capacity(alignment.len());
    let mut candidate = Vec::with_capacity(alignment.len());

    for op in alignment {
        let (top, bottom) = match *op {
            AlignmentOp::Match(c) => (
                DisplayCell::new(c, CellClass::Match),
                DisplayCell::new(c, CellClass::Match),
            ),
            AlignmentOp::Substitute(from, to) => (
                DisplayCell::new(from, CellClass::SubstituteFrom),
                DisplayCell::new(to, CellClass::SubstituteTo),
            ),
            AlignmentOp::Delete(c) => (
                DisplayCell::new(c, CellClass::Delete),
                DisplayCell::new(gap, CellClass::Gap),
            ),
            AlignmentOp::Insert(c) => (
                DisplayCell::new(gap, CellClass::Gap),
                DisplayCell::new(c, CellClass::Insert),
            ),
        };

        extracted.push(top);
        candidate.push(bottom);
    }

    DiffRows { extracted, candidate }
}
