//! Pairwise aligner backed by rust-bio's affine-gap dynamic programming.

use bio::alignment::pairwise::Aligner;
use bio::alignment::{Alignment, AlignmentOperation};
use serde::{Deserialize, Serialize};

use crate::align::scoring::{ScoreConfig, ScoringMatrix, WildcardScores, PAD};
use crate::align::{PairwiseAligner, RawAlignment};

/// Which parts of the query may be left unaligned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMode {
    /// Best-scoring subregions of both sequences
    #[default]
    Local,
    /// Whole query against any subregion of the reference
    SemiGlobal,
    /// Whole query, except where it hangs over either end of the reference
    Overlap,
}

/// Aligner over an immutable scoring matrix.
///
/// A fresh dynamic-programming workspace is allocated per call, so one
/// instance can be shared by reference across threads.
#[derive(Debug, Clone)]
pub struct BioAligner {
    matrix: ScoringMatrix,
    gap_open: i32,
    gap_extend: i32,
    mode: AlignmentMode,
}

impl BioAligner {
    #[must_use]
    pub fn new(config: &ScoreConfig) -> Self {
        Self::with_wildcards(config, WildcardScores::default())
    }

    #[must_use]
    pub fn with_wildcards(config: &ScoreConfig, wildcards: WildcardScores) -> Self {
        Self {
            matrix: ScoringMatrix::with_wildcards(config, wildcards),
            gap_open: config.affine_open(),
            gap_extend: config.affine_extend(),
            mode: AlignmentMode::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    fn aligner(
        &self,
        query_len: usize,
        reference_len: usize,
    ) -> Aligner<impl Fn(u8, u8) -> i32 + '_> {
        let matrix = &self.matrix;
        Aligner::with_capacity(
            query_len,
            reference_len,
            self.gap_open,
            self.gap_extend,
            move |a: u8, b: u8| matrix.score(a, b),
        )
    }
}

impl PairwiseAligner for BioAligner {
    fn align(&self, reference: &[u8], query: &[u8]) -> RawAlignment {
        self.align_in(self.mode, reference, query)
    }

    fn self_score(&self, query: &[u8]) -> i32 {
        // A copy inside a read has no padding to hang its ends on
        let mode = match self.mode {
            AlignmentMode::Overlap => AlignmentMode::SemiGlobal,
            mode => mode,
        };
        self.align_in(mode, query, query).score
    }
}

impl BioAligner {
    fn align_in(&self, mode: AlignmentMode, reference: &[u8], query: &[u8]) -> RawAlignment {
        match mode {
            AlignmentMode::Local => {
                let alignment = self
                    .aligner(query.len(), reference.len())
                    .local(query, reference);
                to_raw(&alignment, 0, reference.len())
            }
            AlignmentMode::SemiGlobal => {
                let alignment =
                    self.aligner(query.len(), reference.len()).semiglobal(query, reference);
                to_raw(&alignment, 0, reference.len())
            }
            AlignmentMode::Overlap => {
                // Zero-score padding lets the query overhang a read end for free
                let pad = query.len();
                let mut padded = Vec::with_capacity(reference.len() + 2 * pad);
                padded.resize(pad, PAD);
                padded.extend_from_slice(reference);
                padded.resize(reference.len() + 2 * pad, PAD);

                let alignment = self.aligner(query.len(), padded.len()).semiglobal(query, &padded);
                to_raw(&alignment, pad, reference.len())
            }
        }
    }
}

/// Convert a rust-bio alignment (x = query, y = reference) to run-length form.
///
/// Reference positions outside `pad..pad + reference_len` are padding: query
/// bases placed there become insertions and padding-only columns are dropped.
fn to_raw(alignment: &Alignment, pad: usize, reference_len: usize) -> RawAlignment {
    let in_reference = |y: usize| y >= pad && y < pad + reference_len;

    let mut cigar = String::new();
    let mut run: Option<(char, usize)> = None;
    let mut ref_begin = None;
    let mut y = alignment.ystart;

    for op in &alignment.operations {
        let symbol = match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                let real = in_reference(y);
                if real {
                    ref_begin.get_or_insert(y - pad);
                }
                y += 1;
                match (real, op) {
                    (false, _) => 'I',
                    (true, AlignmentOperation::Match) => '=',
                    (true, _) => 'X',
                }
            }
            // Ins consumes x only, Del consumes y only
            AlignmentOperation::Ins => 'I',
            AlignmentOperation::Del => {
                let real = in_reference(y);
                if real {
                    ref_begin.get_or_insert(y - pad);
                }
                y += 1;
                if !real {
                    continue;
                }
                'D'
            }
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => continue,
        };
        run = match run {
            Some((current, len)) if current == symbol => Some((current, len + 1)),
            Some((current, len)) => {
                cigar.push_str(&format!("{len}{current}"));
                Some((symbol, 1))
            }
            None => Some((symbol, 1)),
        };
    }
    if let Some((current, len)) = run {
        cigar.push_str(&format!("{len}{current}"));
    }

    RawAlignment {
        score: alignment.score,
        cigar,
        ref_begin: ref_begin.unwrap_or(alignment.ystart.saturating_sub(pad).min(reference_len)),
        query_begin: alignment.xstart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::cigar::AlignmentResult;

    #[test]
    fn test_local_exact_match() {
        let aligner = BioAligner::new(&ScoreConfig::default());
        let raw = aligner.align(b"TTACGTTT", b"ACGT");
        assert_eq!(raw.score, 4);
        assert_eq!(raw.cigar, "4=");
        assert_eq!(raw.ref_begin, 2);
        assert_eq!(raw.query_begin, 0);
    }

    #[test]
    fn test_local_self_alignment_score() {
        let aligner = BioAligner::new(&ScoreConfig::default());
        let query = b"ACTTGCCTGTCGCTCTATCTTC";
        assert_eq!(aligner.align(query, query).score, 22);
    }

    #[test]
    fn test_gap_cost_follows_first_position_convention() {
        // open=3, extend=1: a single-base gap costs 3
        let config = ScoreConfig::new(2, -5, 3, 1).unwrap();
        let aligner = BioAligner::new(&config);
        let raw = aligner.align(b"AAAAAACCCCCC", b"AAAAAAGCCCCCC");
        assert_eq!(raw.score, 24 - 3);
        assert_eq!(raw.cigar, "6=1I6=");
    }

    #[test]
    fn test_wildcard_query_bases() {
        let aligner = BioAligner::new(&ScoreConfig::default());
        let raw = aligner.align(b"GGACGTCCGG", b"ACNNCC");
        // Four matched bases, two zero-score wildcards
        assert_eq!(raw.score, 4);
        let result = AlignmentResult::from_raw(&raw).unwrap();
        assert_eq!(result.reference_start, 2);
        assert_eq!(result.reference_end, 8);
    }

    #[test]
    fn test_semi_global_aligns_whole_query() {
        let aligner = BioAligner::new(&ScoreConfig::default()).with_mode(AlignmentMode::SemiGlobal);
        let raw = aligner.align(b"GGGGACGTGGGG", b"TTACGT");
        // The unmatched query prefix is paid for as a gap instead of clipped
        assert_eq!(raw.score, 2);
        assert_eq!(raw.cigar, "2I4=");
        let result = AlignmentResult::from_raw(&raw).unwrap();
        assert_eq!(result.reference_start, 4);
        assert_eq!(result.reference_end, 8);
        assert_eq!(result.query_end, 6);
    }

    #[test]
    fn test_overlap_allows_overhang_at_read_start() {
        let aligner = BioAligner::new(&ScoreConfig::default()).with_mode(AlignmentMode::Overlap);
        // Read starts with the last six query bases
        let raw = aligner.align(b"CTCTTCGGGGGGGG", b"ACTTGCCTCTCTTC");
        assert_eq!(raw.score, 6);
        assert_eq!(raw.cigar, "8I6=");
        assert_eq!(raw.ref_begin, 0);
        let result = AlignmentResult::from_raw(&raw).unwrap();
        assert_eq!((result.query_start, result.query_end), (8, 14));
        assert_eq!((result.reference_start, result.reference_end), (0, 6));
    }

    #[test]
    fn test_overlap_embedded_query_matches_local() {
        let overlap = BioAligner::new(&ScoreConfig::default()).with_mode(AlignmentMode::Overlap);
        let raw = overlap.align(b"TTACGTTT", b"ACGT");
        assert_eq!(raw.score, 4);
        assert_eq!(raw.cigar, "4=");
        assert_eq!(raw.ref_begin, 2);
    }
}
