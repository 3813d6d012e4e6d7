use log::{debug, trace};

use crate::matrices::{AlignmentMatrices, State};
use crate::scoring::{normalize, residues_match, ScoringScheme, GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentOp {
    Match,
    Mismatch,
    /// Adapter symbol against a gap in the read row.
    Insertion,
    /// Read symbol against a gap in the adapter row.
    Deletion,
}

/// Two equal-length alignment rows plus the optimal score that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GappedAlignment {
    pub read_row: Vec<u8>,
    pub adapter_row: Vec<u8>,
    pub score: i64,
}

impl GappedAlignment {
    pub fn len(&self) -> usize {
        self.read_row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_row.is_empty()
    }

    pub fn operations(&self) -> impl Iterator<Item = AlignmentOp> + '_ {
        self.read_row
            .iter()
            .zip(&self.adapter_row)
            .map(|(&r, &a)| match (r, a) {
                (GAP, _) => AlignmentOp::Insertion,
                (_, GAP) => AlignmentOp::Deletion,
                _ if residues_match(r, a) => AlignmentOp::Match,
                _ => AlignmentOp::Mismatch,
            })
    }

    /// Recomputes the score from the rows alone.
    ///
    /// Gap runs before a row's first symbol or after its last one are free;
    /// every other run costs `gap_open + len * gap_ext`.
    pub fn rescore(&self, scoring: &ScoringScheme) -> i64 {
        let read_span = residue_span(&self.read_row);
        let adapter_span = residue_span(&self.adapter_row);
        let interior = |span: Option<(usize, usize)>, col: usize| {
            span.is_some_and(|(first, last)| first < col && col < last)
        };

        let mut score = 0;
        let mut run: Option<(AlignmentOp, usize)> = None;
        for (col, op) in self.operations().enumerate() {
            let interior_gap = match op {
                AlignmentOp::Insertion => interior(read_span, col),
                AlignmentOp::Deletion => interior(adapter_span, col),
                AlignmentOp::Match | AlignmentOp::Mismatch => false,
            };
            if let Some((kind, len)) = run {
                if !interior_gap || kind != op {
                    score += scoring.gap_run(len);
                    run = None;
                }
            }
            match op {
                AlignmentOp::Match | AlignmentOp::Mismatch => {
                    score += scoring.substitution(self.read_row[col], self.adapter_row[col]);
                }
                _ if interior_gap => {
                    run = Some((op, run.map_or(1, |(_, len)| len + 1)));
                }
                _ => {}
            }
        }
        if let Some((_, len)) = run {
            score += scoring.gap_run(len);
        }
        score
    }
}

/// First and last column holding a symbol rather than a gap.
fn residue_span(row: &[u8]) -> Option<(usize, usize)> {
    let first = row.iter().position(|&b| b != GAP)?;
    let last = row.iter().rposition(|&b| b != GAP)?;
    Some((first, last))
}

#[derive(Debug, Clone, Copy)]
struct EndCell {
    row: usize,
    col: usize,
    state: State,
    score: i64,
}

/// Picks where the traceback starts. Trailing gaps are free, so any cell of
/// the last row or last column may end the alignment, but it must end on an
/// aligned pair: with both sequences non-empty the rows then always share at
/// least one column. The corner is tried first, then the last column
/// bottom-up, then the last row right-to-left; a later cell wins only with a
/// strictly greater score.
fn select_end_cell(mats: &AlignmentMatrices) -> EndCell {
    let n = mats.read_len();
    let m = mats.adapter_len();

    let cell = |row: usize, col: usize| EndCell {
        row,
        col,
        state: State::M,
        score: mats.m.get(row, col),
    };

    if n == 0 || m == 0 {
        return cell(n, m);
    }

    let last_col = (1..n).rev().map(|i| cell(i, m));
    let last_row = (1..m).rev().map(|j| cell(n, j));

    last_col
        .chain(last_row)
        .fold(cell(n, m), |best, c| if c.score > best.score { c } else { best })
}

/// Optimal alignment of `read` against `adapter` with all four end gaps free.
///
/// Never fails: empty inputs give an empty (or all-gap) alignment scoring 0.
pub fn align(read: &[u8], adapter: &[u8], scoring: &ScoringScheme) -> GappedAlignment {
    let read: Vec<u8> = read.iter().copied().map(normalize).collect();
    let adapter: Vec<u8> = adapter.iter().copied().map(normalize).collect();

    let mats = AlignmentMatrices::fill(&read, &adapter, scoring);
    let end = select_end_cell(&mats);

    debug!(
        "aligned {} bp read to {} bp adapter: score {} ending at ({}, {}) in {:?}",
        read.len(),
        adapter.len(),
        end.score,
        end.row,
        end.col,
        end.state
    );

    let (read_row, adapter_row) = trace_back(&mats, &read, &adapter, end, scoring);
    trace!("read row:    {}", String::from_utf8_lossy(&read_row));
    trace!("adapter row: {}", String::from_utf8_lossy(&adapter_row));

    GappedAlignment {
        read_row,
        adapter_row,
        score: end.score,
    }
}

fn trace_back(
    mats: &AlignmentMatrices,
    read: &[u8],
    adapter: &[u8],
    end: EndCell,
    scoring: &ScoringScheme,
) -> (Vec<u8>, Vec<u8>) {
    let capacity = read.len() + adapter.len();
    let mut read_row = Vec::with_capacity(capacity);
    let mut adapter_row = Vec::with_capacity(capacity);

    // Rows are built back to front and reversed at the end.
    for &a in adapter[end.col..].iter().rev() {
        read_row.push(GAP);
        adapter_row.push(a);
    }
    for &r in read[end.row..].iter().rev() {
        read_row.push(r);
        adapter_row.push(GAP);
    }

    let gap_first = scoring.gap_first();
    let (mut i, mut j, mut state) = (end.row, end.col, end.state);
    while i > 0 && j > 0 {
        match state {
            State::M => {
                read_row.push(read[i - 1]);
                adapter_row.push(adapter[j - 1]);
                state = mats.best_state(i - 1, j - 1).0;
                i -= 1;
                j -= 1;
            }
            State::Ix => {
                read_row.push(read[i - 1]);
                adapter_row.push(GAP);
                if mats.ix.get(i, j) != mats.m.get(i - 1, j) + gap_first {
                    state = State::Ix;
                } else {
                    state = State::M;
                }
                i -= 1;
            }
            State::Iy => {
                read_row.push(GAP);
                adapter_row.push(adapter[j - 1]);
                if mats.iy.get(i, j) != mats.m.get(i, j - 1) + gap_first {
                    state = State::Iy;
                } else {
                    state = State::M;
                }
                j -= 1;
            }
        }
    }

    for &r in read[..i].iter().rev() {
        read_row.push(r);
        adapter_row.push(GAP);
    }
    for &a in adapter[..j].iter().rev() {
        read_row.push(GAP);
        adapter_row.push(a);
    }

    read_row.reverse();
    adapter_row.reverse();
    (read_row, adapter_row)
}
