//! Turns a gapped alignment into the positional and identity statistics the
//! trimming logic consumes.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::scoring::{residues_match, GAP};
use crate::traceback::GappedAlignment;
use crate::AdapterAlignError;

/// Written in place of every position when the rows share no overlap.
pub const SENTINEL: i64 = -1;

/// Ungapped 0-based offsets of the aligned region within each sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapCoords {
    pub read_start: usize,
    pub read_end: usize,
    pub adapter_start: usize,
    pub adapter_end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    /// `None` when one of the sequences contributed no symbols at all.
    pub coords: Option<OverlapCoords>,
    pub raw_score: i64,
    /// Identity over the columns where both sequences have started and not yet ended.
    pub aligned_region_identity: f64,
    /// Identity over the adapter's own extent. `None` only for records parsed
    /// from the legacy five-field format.
    pub full_adapter_identity: Option<f64>,
}

impl AlignmentResult {
    pub fn sentinel(raw_score: i64) -> Self {
        Self {
            coords: None,
            raw_score,
            aligned_region_identity: 0.0,
            full_adapter_identity: Some(0.0),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.coords.is_none()
    }

    /// Half-open range of the read covered by the aligned region.
    pub fn read_range(&self) -> Option<Range<usize>> {
        self.coords.map(|c| c.read_start..c.read_end + 1)
    }

    pub fn adapter_range(&self) -> Option<Range<usize>> {
        self.coords.map(|c| c.adapter_start..c.adapter_end + 1)
    }
}

/// First column at which both rows have shown a symbol, scanning the given
/// column order. Each row may start in a different column.
fn both_started(alignment: &GappedAlignment, cols: impl Iterator<Item = usize>) -> Option<usize> {
    let (mut read_seen, mut adapter_seen) = (false, false);
    for col in cols {
        read_seen |= alignment.read_row[col] != GAP;
        adapter_seen |= alignment.adapter_row[col] != GAP;
        if read_seen && adapter_seen {
            return Some(col);
        }
    }
    None
}

/// Percentage of identical columns in `first..=last`; 0 for an empty span.
fn percent_identity(alignment: &GappedAlignment, first: usize, last: usize) -> f64 {
    if last < first {
        return 0.0;
    }
    let matches = (first..=last)
        .filter(|&col| residues_match(alignment.read_row[col], alignment.adapter_row[col]))
        .count();
    100.0 * matches as f64 / (last - first + 1) as f64
}

/// Computes the statistics record for one alignment.
pub fn extract_stats(alignment: &GappedAlignment) -> AlignmentResult {
    debug_assert_eq!(alignment.read_row.len(), alignment.adapter_row.len());
    let len = alignment.len();
    if len == 0 {
        return AlignmentResult::sentinel(alignment.score);
    }

    let (start, end) = match (
        both_started(alignment, 0..len),
        both_started(alignment, (0..len).rev()),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => return AlignmentResult::sentinel(alignment.score),
    };

    // Both rows hold a symbol somewhere, so the adapter extent exists.
    let adapter_first = alignment
        .adapter_row
        .iter()
        .position(|&b| b != GAP)
        .unwrap_or(start);
    let adapter_last = alignment
        .adapter_row
        .iter()
        .rposition(|&b| b != GAP)
        .unwrap_or(end);

    let mut coords = OverlapCoords {
        read_start: 0,
        read_end: 0,
        adapter_start: 0,
        adapter_end: 0,
    };
    let (mut read_bases, mut adapter_bases) = (0, 0);
    for col in 0..len {
        if col == start {
            coords.read_start = read_bases;
            coords.adapter_start = adapter_bases;
        }
        if col == end {
            coords.read_end = read_bases;
            coords.adapter_end = adapter_bases;
        }
        if alignment.read_row[col] != GAP {
            read_bases += 1;
        }
        if alignment.adapter_row[col] != GAP {
            adapter_bases += 1;
        }
    }

    AlignmentResult {
        coords: Some(coords),
        raw_score: alignment.score,
        aligned_region_identity: percent_identity(alignment, start, end),
        full_adapter_identity: Some(percent_identity(alignment, adapter_first, adapter_last)),
    }
}

/// `read_start,read_end,adapter_start,adapter_end,raw_score,aligned_id,full_adapter_id`
impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = |value: Option<usize>| value.map_or(SENTINEL, |v| v as i64);
        write!(
            f,
            "{},{},{},{},{},{:.6}",
            position(self.coords.map(|c| c.read_start)),
            position(self.coords.map(|c| c.read_end)),
            position(self.coords.map(|c| c.adapter_start)),
            position(self.coords.map(|c| c.adapter_end)),
            self.raw_score,
            self.aligned_region_identity,
        )?;
        if let Some(identity) = self.full_adapter_identity {
            write!(f, ",{identity:.6}")?;
        }
        Ok(())
    }
}

/// Accepts the full seven-field record and the legacy form that stops after
/// the raw score.
impl FromStr for AlignmentResult {
    type Err = AdapterAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: String| AdapterAlignError::InvalidRecord(format!("{s:?}: {why}"));
        let fields: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if fields.len() != 5 && fields.len() != 7 {
            return Err(invalid(format!("expected 5 or 7 fields, found {}", fields.len())));
        }

        let mut positions = [0i64; 4];
        for (slot, field) in positions.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|e| invalid(format!("{field:?}: {e}")))?;
        }
        let raw_score = fields[4]
            .parse()
            .map_err(|e| invalid(format!("{:?}: {e}", fields[4])))?;
        let identity = |field: &str| {
            field
                .parse::<f64>()
                .map_err(|e| invalid(format!("{field:?}: {e}")))
        };

        let coords = match positions {
            [SENTINEL, SENTINEL, SENTINEL, SENTINEL] => None,
            _ if positions.iter().any(|&p| p < 0) => {
                return Err(invalid("negative position outside the sentinel".into()))
            }
            [read_start, read_end, adapter_start, adapter_end] => Some(OverlapCoords {
                read_start: read_start as usize,
                read_end: read_end as usize,
                adapter_start: adapter_start as usize,
                adapter_end: adapter_end as usize,
            }),
        };

        let (aligned_region_identity, full_adapter_identity) = if fields.len() == 7 {
            (identity(fields[5])?, Some(identity(fields[6])?))
        } else {
            (0.0, None)
        };

        Ok(Self {
            coords,
            raw_score,
            aligned_region_identity,
            full_adapter_identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gapped(read: &str, adapter: &str, score: i64) -> GappedAlignment {
        GappedAlignment {
            read_row: read.as_bytes().to_vec(),
            adapter_row: adapter.as_bytes().to_vec(),
            score,
        }
    }

    #[test]
    fn empty_alignment_is_sentinel() {
        let result = extract_stats(&gapped("", "", 0));
        assert!(result.is_sentinel());
        assert_eq!(result.to_string(), "-1,-1,-1,-1,0,0.000000,0.000000");
    }

    #[test]
    fn all_gap_adapter_is_sentinel() {
        let result = extract_stats(&gapped("ACGT", "----", 0));
        assert!(result.is_sentinel());
        assert_eq!(result.read_range(), None);
    }

    #[test]
    fn overlap_at_read_start() {
        let result = extract_stats(&gapped("ACGTTTT", "ACGT---", 12));
        assert_eq!(
            result.coords,
            Some(OverlapCoords {
                read_start: 0,
                read_end: 3,
                adapter_start: 0,
                adapter_end: 3,
            })
        );
        assert_eq!(result.aligned_region_identity, 100.0);
        assert_eq!(result.full_adapter_identity, Some(100.0));
        assert_eq!(result.read_range(), Some(0..4));
        assert_eq!(result.to_string(), "0,3,0,3,12,100.000000,100.000000");
    }

    #[test]
    fn adapter_hanging_off_read_start() {
        // Only the adapter's last two bases overlap the read.
        let result = extract_stats(&gapped("--ACGGT", "TTAC---", 6));
        let coords = result.coords.unwrap();
        assert_eq!((coords.read_start, coords.read_end), (0, 1));
        assert_eq!((coords.adapter_start, coords.adapter_end), (2, 3));
        assert_eq!(result.aligned_region_identity, 100.0);
        assert_eq!(result.full_adapter_identity, Some(50.0));
    }

    #[test]
    fn region_bounded_by_both_rows() {
        let result = extract_stats(&gapped("GGACGTA--", "--ACCTAGG", 0));
        let coords = result.coords.unwrap();
        assert_eq!((coords.read_start, coords.read_end), (2, 6));
        assert_eq!((coords.adapter_start, coords.adapter_end), (0, 4));
        // ACGTA vs ACCTA
        assert_eq!(result.aligned_region_identity, 80.0);
        // ACGTA-- vs ACCTAGG
        assert!((result.full_adapter_identity.unwrap() - 400.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn crossing_rows_give_empty_region() {
        let result = extract_stats(&gapped("AAAA----", "----GGGG", 0));
        let coords = result.coords.unwrap();
        assert_eq!(coords.read_start, 4);
        assert_eq!(coords.read_end, 3);
        assert_eq!(result.aligned_region_identity, 0.0);
        assert_eq!(result.full_adapter_identity, Some(0.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn unequal_rows_are_rejected_in_debug_builds() {
        extract_stats(&gapped("ACGT", "AC", 0));
    }

    #[test]
    fn parses_full_and_legacy_records() {
        let full: AlignmentResult = "0,19,0,19,60,100.000000,100.000000".parse().unwrap();
        assert_eq!(full.read_range(), Some(0..20));
        assert_eq!(full.raw_score, 60);
        assert_eq!(full.full_adapter_identity, Some(100.0));

        let legacy: AlignmentResult = "5,9,0,4,15".parse().unwrap();
        assert_eq!(legacy.adapter_range(), Some(0..5));
        assert_eq!(legacy.full_adapter_identity, None);
        assert_eq!(legacy.to_string(), "5,9,0,4,15,0.000000");

        let sentinel: AlignmentResult = "-1,-1,-1,-1,0,0.0,0.0".parse().unwrap();
        assert!(sentinel.is_sentinel());
    }

    #[test]
    fn rejects_malformed_records() {
        assert!("1,2,3".parse::<AlignmentResult>().is_err());
        assert!("1,2,3,4,x".parse::<AlignmentResult>().is_err());
        assert!("-1,2,3,4,5".parse::<AlignmentResult>().is_err());
        assert!("1,2,3,4,5,abc,1.0".parse::<AlignmentResult>().is_err());
    }
}
