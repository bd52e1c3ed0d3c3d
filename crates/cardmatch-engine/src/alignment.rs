//! Edit distance with full operation backtrace
//!
//! Classic Levenshtein dynamic programming with unit costs for substitution,
//! deletion and insertion. The table is built once; the alignment is then
//! recovered by walking it back from the bottom-right corner.
//!
//! ## Backtrace tie-break
//!
//! Several alignments can share the minimal cost. At every cell the walk
//! prefers, in this order:
//!
//! 1. match, if the characters are equal and the diagonal carries the same cost
//! 2. substitution, if the diagonal is exactly one cheaper
//! 3. deletion (consume an extracted character), if the cell above is one cheaper
//! 4. insertion (consume a candidate character) otherwise
//!
//! Reviewers see whichever alignment this order produces, so it must not
//! change between releases.

use cardmatch_core::{Alignment, AlignmentOp};

/// Distance plus the alignment that realizes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub distance: usize,
    pub alignment: Alignment,
}

/// Filled Levenshtein table for one pair of strings
///
/// Cell `(i, j)` holds the distance between the first `i` characters of the
/// extracted string and the first `j` characters of the candidate.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    extracted: Vec<char>,
    candidate: Vec<char>,
    /// Row-major, `(extracted.len() + 1) * (candidate.len() + 1)` cells
    cells: Vec<usize>,
}

impl DistanceTable {
    /// Fill the table for two character sequences
    pub fn build(extracted: &[char], candidate: &[char]) -> Self {
        let rows = extracted.len() + 1;
        let cols = candidate.len() + 1;
        let mut cells = vec![0usize; rows * cols];

        for j in 0..cols {
            cells[j] = j;
        }
        for i in 0..rows {
            cells[i * cols] = i;
        }

        for i in 1..rows {
            for j in 1..cols {
                let diagonal = cells[(i - 1) * cols + (j - 1)];
                cells[i * cols + j] = if extracted[i - 1] == candidate[j - 1] {
                    diagonal
                } else {
                    let up = cells[(i - 1) * cols + j];
                    let left = cells[i * cols + (j - 1)];
                    1 + diagonal.min(up).min(left)
                };
            }
        }

        Self {
            extracted: extracted.to_vec(),
            candidate: candidate.to_vec(),
            cells,
        }
    }

    fn cols(&self) -> usize {
        self.candidate.len() + 1
    }

    /// Cost at cell `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols() + j]
    }

    /// Edit distance between the full strings
    pub fn distance(&self) -> usize {
        self.get(self.extracted.len(), self.candidate.len())
    }

    /// Recover the alignment, in left-to-right order
    pub fn backtrace(&self) -> Alignment {
        let mut i = self.extracted.len();
        let mut j = self.candidate.len();
        let mut reversed = Vec::with_capacity(i.max(j));

        while i > 0 || j > 0 {
            let here = self.get(i, j);

            if i > 0 && j > 0 {
                let a = self.extracted[i - 1];
                let b = self.candidate[j - 1];
                let diagonal = self.get(i - 1, j - 1);

                if a == b && here == diagonal {
                    reversed.push(AlignmentOp::Match(a));
                    i -= 1;
                    j -= 1;
                    continue;
                }
                if here == diagonal + 1 {
                    reversed.push(AlignmentOp::Substitute(a, b));
                    i -= 1;
                    j -= 1;
                    continue;
                }
            }

            if i > 0 && here == self.get(i - 1, j) + 1 {
                reversed.push(AlignmentOp::Delete(self.extracted[i - 1]));
                i -= 1;
            } else {
                // First row always lands here; elsewhere the left cell is one cheaper
                reversed.push(AlignmentOp::Insert(self.candidate[j - 1]));
                j -= 1;
            }
        }

        reversed.reverse();
        Alignment::from_ops(reversed)
    }
}

/// Align two strings, extracted first
///
/// Never fails: empty inputs yield an all-insert or all-delete alignment.
pub fn align(extracted: &str, candidate: &str) -> AlignmentResult {
    let a: Vec<char> = extracted.chars().collect();
    let b: Vec<char> = candidate.chars().collect();
    align_chars(&a, &b)
}

/// [`align`] over pre-split character sequences
pub fn align_chars(extracted: &[char], candidate: &[char]) -> AlignmentResult {
    let table = DistanceTable::build(extracted, candidate);
    AlignmentResult {
        distance: table.distance(),
        alignment: table.backtrace(),
    }
}

/// Distance only, skipping the backtrace
pub fn edit_distance(extracted: &str, candidate: &str) -> usize {
    let a: Vec<char> = extracted.chars().collect();
    let b: Vec<char> = candidate.chars().collect();
    DistanceTable::build(&a, &b).distance()
}
