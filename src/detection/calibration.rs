//! Per-query score cutoffs.
//!
//! Two policies are available and the caller picks one:
//!
//! - [`SelfAlignment`]: a fraction of the score of the query aligned to itself,
//!   the best any alignment of that query can reach. One alignment per query.
//! - [`ShuffledNull`]: a quantile of the scores of the query aligned against
//!   random permutations of itself. `samples` alignments per query.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::align::PairwiseAligner;
use crate::core::sequence::shuffled;

/// Strategy that turns a query sequence into a score cutoff
pub trait CalibrationPolicy: Send + Sync {
    /// Cutoff for a non-empty `query`
    fn cutoff(&self, query: &[u8], aligner: &dyn PairwiseAligner) -> f64;

    /// Short name used in logs and summaries
    fn name(&self) -> &'static str;
}

/// Calibration selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationKind {
    /// Fraction of the self-alignment score
    #[default]
    #[value(name = "self")]
    SelfAlignment,
    /// Quantile of a shuffled-query null distribution
    Shuffled,
}

/// Cutoff = `fraction` x score of the query aligned against itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfAlignment {
    pub fraction: f64,
}

impl SelfAlignment {
    #[must_use]
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }
}

impl CalibrationPolicy for SelfAlignment {
    fn cutoff(&self, query: &[u8], aligner: &dyn PairwiseAligner) -> f64 {
        calibrate(query, aligner, self.fraction)
    }

    fn name(&self) -> &'static str {
        "self"
    }
}

/// Self-alignment cutoff of `query` scaled by `fraction`
#[must_use]
pub fn calibrate(query: &[u8], aligner: &dyn PairwiseAligner, fraction: f64) -> f64 {
    f64::from(aligner.self_score(query)) * fraction
}

/// Cutoff = `fraction` quantile of the scores of shuffled copies of the query
/// aligned against the query itself.
///
/// Shuffles are drawn from an RNG seeded with `seed`, so the cutoff is
/// reproducible for a given query and configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShuffledNull {
    pub fraction: f64,
    pub samples: usize,
    pub seed: u64,
}

impl ShuffledNull {
    #[must_use]
    pub fn new(fraction: f64, samples: usize, seed: u64) -> Self {
        Self {
            fraction,
            samples,
            seed,
        }
    }
}

impl CalibrationPolicy for ShuffledNull {
    fn cutoff(&self, query: &[u8], aligner: &dyn PairwiseAligner) -> f64 {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut null_scores: Vec<f64> = (0..self.samples)
            .map(|_| {
                let decoy = shuffled(query, &mut rng);
                f64::from(aligner.align(&decoy, query).score)
            })
            .collect();
        null_scores.sort_by(f64::total_cmp);
        quantile(&null_scores, self.fraction)
    }

    fn name(&self) -> &'static str {
        "shuffled"
    }
}

/// Linearly interpolated quantile `q` in [0, 1] of sorted values; 0.0 when empty
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            #[allow(clippy::cast_precision_loss)]
            let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(sorted.len() - 1);
            #[allow(clippy::cast_precision_loss)]
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}
