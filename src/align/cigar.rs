//! Decoding of the aligner's run-length encoded CIGAR into typed operations,
//! the per-column alignment path and the aligned coordinates.

use crate::align::{AlignError, RawAlignment};

/// Kind of a CIGAR run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarKind {
    /// `=`: identical symbols
    Equal,
    /// `X`: substitution
    Diff,
    /// `M`: aligned column, identity not reported
    AlignMatch,
    /// `I`: query bases with no reference counterpart
    Insertion,
    /// `D`: reference bases with no query counterpart
    Deletion,
}

impl CigarKind {
    /// Decode a CIGAR symbol.
    ///
    /// # Errors
    ///
    /// Returns `AlignError::UnrecognizedOperation` for any symbol outside `=XMID`.
    pub fn from_symbol(symbol: char) -> Result<Self, AlignError> {
        match symbol {
            '=' => Ok(Self::Equal),
            'X' => Ok(Self::Diff),
            'M' => Ok(Self::AlignMatch),
            'I' => Ok(Self::Insertion),
            'D' => Ok(Self::Deletion),
            other => Err(AlignError::UnrecognizedOperation(other)),
        }
    }

    #[must_use]
    pub fn consumes_reference(self) -> bool {
        !matches!(self, Self::Insertion)
    }

    #[must_use]
    pub fn consumes_query(self) -> bool {
        !matches!(self, Self::Deletion)
    }
}

/// One run of identical operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub kind: CigarKind,
    pub len: usize,
}

impl CigarOp {
    #[must_use]
    pub fn new(kind: CigarKind, len: usize) -> Self {
        Self { kind, len }
    }
}

/// Parse a CIGAR string such as `3=1X2I4=`.
///
/// # Errors
///
/// Returns `AlignError::UnrecognizedOperation` for an unknown operation symbol and
/// `AlignError::MalformedCigar` when a run has no count or the string ends in a count.
pub fn parse_cigar(cigar: &str) -> Result<Vec<CigarOp>, AlignError> {
    let mut ops = Vec::new();
    let mut count: Option<usize> = None;

    for c in cigar.chars() {
        if let Some(digit) = c.to_digit(10) {
            let current = count.unwrap_or(0);
            count = Some(
                current
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit as usize))
                    .ok_or_else(|| AlignError::MalformedCigar(cigar.to_string()))?,
            );
            continue;
        }

        let kind = CigarKind::from_symbol(c)?;
        let len = count
            .take()
            .ok_or_else(|| AlignError::MalformedCigar(cigar.to_string()))?;
        ops.push(CigarOp::new(kind, len));
    }

    if count.is_some() {
        return Err(AlignError::MalformedCigar(cigar.to_string()));
    }

    Ok(ops)
}

/// One alignment column: reference and query positions, `None` for a gap
pub type PathStep = (Option<usize>, Option<usize>);

/// Expand operations into alignment columns starting at the given offsets
#[must_use]
pub fn alignment_path(ops: &[CigarOp], ref_begin: usize, query_begin: usize) -> Vec<PathStep> {
    let mut path = Vec::with_capacity(ops.iter().map(|op| op.len).sum());
    let mut ref_pos = ref_begin;
    let mut query_pos = query_begin;

    for op in ops {
        for _ in 0..op.len {
            let r = op.kind.consumes_reference().then(|| {
                ref_pos += 1;
                ref_pos - 1
            });
            let q = op.kind.consumes_query().then(|| {
                query_pos += 1;
                query_pos - 1
            });
            path.push((r, q));
        }
    }

    path
}

/// Score and half-open coordinates of an alignment.
///
/// Coordinates span from the first to the last column in which both sequences
/// have a base; when no such column exists all coordinates are zero and
/// [`AlignmentResult::is_empty`] is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentResult {
    pub score: i32,
    pub reference_start: usize,
    pub reference_end: usize,
    pub query_start: usize,
    pub query_end: usize,
}

impl AlignmentResult {
    /// Decode the aligner output into coordinates.
    ///
    /// # Errors
    ///
    /// Propagates CIGAR decoding errors; these are contract violations of the aligner.
    pub fn from_raw(raw: &RawAlignment) -> Result<Self, AlignError> {
        let ops = parse_cigar(&raw.cigar)?;
        let path = alignment_path(&ops, raw.ref_begin, raw.query_begin);

        let mut aligned = path
            .iter()
            .filter_map(|&(r, q)| Some((r?, q?)));

        let Some((ref_first, query_first)) = aligned.next() else {
            return Ok(Self {
                score: raw.score,
                reference_start: 0,
                reference_end: 0,
                query_start: 0,
                query_end: 0,
            });
        };
        let (ref_last, query_last) = aligned.last().unwrap_or((ref_first, query_first));

        Ok(Self {
            score: raw.score,
            reference_start: ref_first,
            reference_end: ref_last + 1,
            query_start: query_first,
            query_end: query_last + 1,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_end == self.query_start
    }

    /// Number of query bases spanned by the alignment
    #[must_use]
    pub fn query_span(&self) -> usize {
        self.query_end - self.query_start
    }
}
