use crate::scoring::ScoringScheme;

/// Score of a state that no alignment can reach. `fill` clamps `Ix`/`Iy` to
/// it from below so repeated `+ gap_ext` never drifts toward overflow.
pub(crate) const UNREACHABLE: i64 = i64::MIN / 4;

/// Row-major `(|read| + 1) x (|adapter| + 1)` score table.
pub struct DpMatrix {
    data: Vec<i64>,
    rows: usize,
    cols: usize,
}

impl DpMatrix {
    pub fn new(rows: usize, cols: usize, fill: i64) -> Self {
        Self {
            data: vec![fill; rows * cols],
            rows,
            cols,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Which of the three tables a cell value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Read symbol aligned to adapter symbol.
    M,
    /// Read symbol against a gap in the adapter row.
    Ix,
    /// Adapter symbol against a gap in the read row.
    Iy,
}

/// Gotoh tables for one read/adapter pair.
///
/// Leading gaps are free: `M` is zero along row 0 and column 0, while `Ix`
/// and `Iy` start unreachable there, so any gap run opened after both
/// sequences have started pays the full affine cost.
pub struct AlignmentMatrices {
    pub m: DpMatrix,
    pub ix: DpMatrix,
    pub iy: DpMatrix,
}

impl AlignmentMatrices {
    /// Fills all three tables. `read` and `adapter` must already be normalised.
    pub fn fill(read: &[u8], adapter: &[u8], scoring: &ScoringScheme) -> Self {
        let rows = read.len() + 1;
        let cols = adapter.len() + 1;

        let mut m = DpMatrix::new(rows, cols, 0);
        let mut ix = DpMatrix::new(rows, cols, UNREACHABLE);
        let mut iy = DpMatrix::new(rows, cols, UNREACHABLE);

        let gap_first = scoring.gap_first();
        let gap_extend = scoring.gap_extend();

        for i in 1..rows {
            let r = read[i - 1];
            for j in 1..cols {
                let diag = m
                    .get(i - 1, j - 1)
                    .max(ix.get(i - 1, j - 1))
                    .max(iy.get(i - 1, j - 1));
                m.set(i, j, diag + scoring.substitution(r, adapter[j - 1]));

                let up = (m.get(i - 1, j) + gap_first).max(ix.get(i - 1, j) + gap_extend);
                ix.set(i, j, up.max(UNREACHABLE));

                let left = (m.get(i, j - 1) + gap_first).max(iy.get(i, j - 1) + gap_extend);
                iy.set(i, j, left.max(UNREACHABLE));
            }
        }

        Self { m, ix, iy }
    }

    #[inline]
    pub fn get(&self, state: State, row: usize, col: usize) -> i64 {
        match state {
            State::M => self.m.get(row, col),
            State::Ix => self.ix.get(row, col),
            State::Iy => self.iy.get(row, col),
        }
    }

    /// Best state at a cell, preferring `M`, then `Ix`, then `Iy` on ties.
    pub fn best_state(&self, row: usize, col: usize) -> (State, i64) {
        let mut best = (State::M, self.m.get(row, col));
        for state in [State::Ix, State::Iy] {
            let score = self.get(state, row, col);
            if score > best.1 {
                best = (state, score);
            }
        }
        best
    }

    pub fn read_len(&self) -> usize {
        self.m.rows() - 1
    }

    pub fn adapter_len(&self) -> usize {
        self.m.cols() - 1
    }
}
