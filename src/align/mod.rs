//! Alignment adapter: a thin contract over a pairwise aligner.
//!
//! - [`ScoreConfig`]: match/mismatch/gap parameters for a run
//! - [`scoring::ScoringMatrix`]: substitution scores with `N`/`X` wildcards
//! - [`PairwiseAligner`]: the aligner contract, returning a [`RawAlignment`]
//! - [`pairwise::BioAligner`]: the rust-bio implementation
//! - [`cigar`]: decoding of the run-length CIGAR into operations, path and
//!   [`AlignmentResult`] coordinates
//!
//! The aligner reports its path as run-length encoded text; decoding it is the
//! only place an aligner contract violation (an unknown operation symbol) can
//! surface, and it is always fatal.

use thiserror::Error;

pub mod cigar;
pub mod pairwise;
pub mod scoring;

pub use cigar::AlignmentResult;
pub use pairwise::{AlignmentMode, BioAligner};
pub use scoring::{ScoreConfig, WildcardScores};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("Unrecognized alignment operation '{0}' in aligner output")]
    UnrecognizedOperation(char),

    #[error("Malformed CIGAR string: '{0}'")]
    MalformedCigar(String),
}

/// Aligner output before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAlignment {
    /// Alignment score
    pub score: i32,

    /// Run-length encoded operations (`=`, `X`, `M`, `I`, `D`)
    pub cigar: String,

    /// Reference offset of the first operation
    pub ref_begin: usize,

    /// Query offset of the first operation
    pub query_begin: usize,
}

/// Pairwise alignment of a query against a reference
pub trait PairwiseAligner: Send + Sync {
    /// Align `query` against `reference` and report the best alignment
    fn align(&self, reference: &[u8], query: &[u8]) -> RawAlignment;

    /// Best score of `query` aligned against an exact copy of itself
    fn self_score(&self, query: &[u8]) -> i32 {
        self.align(query, query).score
    }

    /// Align and decode the result into coordinates.
    ///
    /// # Errors
    ///
    /// Returns an `AlignError` if the aligner output cannot be decoded.
    fn align_result(&self, reference: &[u8], query: &[u8]) -> Result<AlignmentResult, AlignError> {
        AlignmentResult::from_raw(&self.align(reference, query))
    }
}
