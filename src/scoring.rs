use std::fmt;
use std::str::FromStr;

use crate::AdapterAlignError;

pub const DEFAULT_MATCH: i32 = 3;
pub const DEFAULT_MISMATCH: i32 = -6;
pub const DEFAULT_GAP_OPEN: i32 = -5;
pub const DEFAULT_GAP_EXT: i32 = -2;

/// Gap marker used in gapped rows.
pub const GAP: u8 = b'-';
/// Stand-in for any input byte outside `ACGTN`.
pub const UNKNOWN: u8 = b'X';

/// Match/mismatch rewards and affine gap penalties.
///
/// A gap run of length `L` costs `gap_open + L * gap_ext`. Values are taken
/// as given: nothing stops a caller from passing a positive "penalty".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringScheme {
    pub match_score: i32,
    pub mismatch: i32,
    pub gap_open: i32,
    pub gap_ext: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_score: DEFAULT_MATCH,
            mismatch: DEFAULT_MISMATCH,
            gap_open: DEFAULT_GAP_OPEN,
            gap_ext: DEFAULT_GAP_EXT,
        }
    }
}

impl ScoringScheme {
    pub fn new(match_score: i32, mismatch: i32, gap_open: i32, gap_ext: i32) -> Self {
        Self {
            match_score,
            mismatch,
            gap_open,
            gap_ext,
        }
    }

    /// Score of placing two (normalised) symbols in the same column.
    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> i64 {
        if residues_match(a, b) {
            self.match_score as i64
        } else {
            self.mismatch as i64
        }
    }

    /// Cost of the first symbol of a gap run.
    #[inline]
    pub fn gap_first(&self) -> i64 {
        self.gap_open as i64 + self.gap_ext as i64
    }

    #[inline]
    pub fn gap_extend(&self) -> i64 {
        self.gap_ext as i64
    }

    /// Total cost of an interior gap run of `len` symbols.
    pub fn gap_run(&self, len: usize) -> i64 {
        if len == 0 {
            0
        } else {
            self.gap_open as i64 + len as i64 * self.gap_ext as i64
        }
    }
}

impl fmt::Display for ScoringScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.match_score, self.mismatch, self.gap_open, self.gap_ext
        )
    }
}

/// Parses `"match,mismatch,gap_open,gap_ext"`, e.g. `"3,-6,-5,-2"`.
impl FromStr for ScoringScheme {
    type Err = AdapterAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdapterAlignError::InvalidScoringScheme(format!("{s:?}: {e}")))?;

        match values.as_slice() {
            &[match_score, mismatch, gap_open, gap_ext] => {
                Ok(Self::new(match_score, mismatch, gap_open, gap_ext))
            }
            _ => Err(AdapterAlignError::InvalidScoringScheme(format!(
                "{s:?}: expected 4 values, found {}",
                values.len()
            ))),
        }
    }
}

/// Upper-cases nucleotide symbols and maps everything else to [`UNKNOWN`].
#[inline]
pub fn normalize(symbol: u8) -> u8 {
    match symbol.to_ascii_uppercase() {
        b @ (b'A' | b'C' | b'G' | b'T' | b'N') => b,
        _ => UNKNOWN,
    }
}

/// True when two row symbols count as identical. Gaps and unknown symbols
/// never match anything, themselves included.
#[inline]
pub fn residues_match(a: u8, b: u8) -> bool {
    a == b && a != GAP && a != UNKNOWN
}
