//! Accept/reject decision for one (read, query) pair.
//!
//! The cutoff of a query is a score for full-length coverage. An alignment
//! that covers only part of the query must reach the same score per covered
//! query base:
//!
//! ```text
//! required = cutoff * (query_end - query_start) / query_len
//! ```
//!
//! so a short chance alignment of a few query bases is held to the density of
//! a full match, while a query truncated at a read end can still pass.

use crate::align::{AlignError, AlignmentResult, PairwiseAligner};

/// An accepted match of a query inside a reference
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Reference bases between `reference_start` and `reference_end`
    pub sequence: Vec<u8>,

    /// Raw alignment score
    pub score: i32,

    /// Score the alignment had to reach
    pub required_score: f64,

    pub reference_start: usize,
    pub reference_end: usize,
    pub query_start: usize,
    pub query_end: usize,
}

impl Match {
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Outcome of classifying a reference against a query
#[derive(Debug, Clone, PartialEq)]
pub enum MatchVerdict {
    Accepted(Match),
    Rejected,
}

impl MatchVerdict {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The match, if accepted
    #[must_use]
    pub fn accepted(self) -> Option<Match> {
        match self {
            Self::Accepted(m) => Some(m),
            Self::Rejected => None,
        }
    }
}

/// Score an alignment covering `matched_len` query bases must reach
#[must_use]
pub fn required_score(cutoff: f64, query_len: usize, matched_len: usize) -> f64 {
    if query_len == 0 {
        return f64::INFINITY;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        cutoff * matched_len as f64 / query_len as f64
    }
}

/// Apply the cutoff rule to an alignment of `query_len` query bases
#[must_use]
pub fn judge(
    alignment: &AlignmentResult,
    reference: &[u8],
    query_len: usize,
    cutoff: f64,
) -> MatchVerdict {
    if alignment.is_empty() {
        return MatchVerdict::Rejected;
    }

    let required = required_score(cutoff, query_len, alignment.query_span());
    if f64::from(alignment.score) < required {
        return MatchVerdict::Rejected;
    }

    MatchVerdict::Accepted(Match {
        sequence: reference[alignment.reference_start..alignment.reference_end].to_vec(),
        score: alignment.score,
        required_score: required,
        reference_start: alignment.reference_start,
        reference_end: alignment.reference_end,
        query_start: alignment.query_start,
        query_end: alignment.query_end,
    })
}

/// Align `query` against `reference` and decide whether it is a match.
///
/// # Errors
///
/// Returns an `AlignError` if the aligner output violates its contract; this is
/// never a per-read condition and callers abort on it.
pub fn classify(
    reference: &[u8],
    query: &[u8],
    cutoff: f64,
    aligner: &dyn PairwiseAligner,
) -> Result<MatchVerdict, AlignError> {
    if query.is_empty() || reference.is_empty() {
        return Ok(MatchVerdict::Rejected);
    }
    let alignment = aligner.align_result(reference, query)?;
    Ok(judge(&alignment, reference, query.len(), cutoff))
}
