use thiserror::Error;

pub mod extract;
pub mod ffi;
pub mod matrices;
pub mod scoring;
pub mod traceback;

pub use extract::{extract_stats, AlignmentResult, OverlapCoords, SENTINEL};
pub use scoring::ScoringScheme;
pub use traceback::{align, AlignmentOp, GappedAlignment};

#[derive(Debug, Error)]
pub enum AdapterAlignError {
    #[error("Invalid scoring scheme: {0}")]
    InvalidScoringScheme(String),
    #[error("Invalid alignment record: {0}")]
    InvalidRecord(String),
    #[error("Record cannot cross the C boundary: {0}")]
    Boundary(#[from] std::ffi::NulError),
}

/// Aligns reads against adapters with a fixed scoring scheme.
///
/// Holds no per-call state, so one aligner can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdapterAligner {
    scoring: ScoringScheme,
}

impl AdapterAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scoring(mut self, scoring: ScoringScheme) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn scoring(&self) -> &ScoringScheme {
        &self.scoring
    }

    pub fn align(&self, read: &[u8], adapter: &[u8]) -> GappedAlignment {
        traceback::align(read, adapter, &self.scoring)
    }

    pub fn align_adapter(&self, read: &[u8], adapter: &[u8]) -> AlignmentResult {
        extract_stats(&self.align(read, adapter))
    }
}

/// One-shot alignment returning the statistics record.
pub fn adapter_alignment(read: &[u8], adapter: &[u8], scoring: &ScoringScheme) -> AlignmentResult {
    AdapterAligner::new().with_scoring(*scoring).align_adapter(read, adapter)
}
