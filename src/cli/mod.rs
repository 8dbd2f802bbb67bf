//! Command-line interface for hammerpede.
//!
//! Available commands:
//!
//! - **train**: detect primers in reads and build strand-specific profile HMMs
//! - **cutoffs**: load and calibrate the queries, printing their score cutoffs
//!
//! ## Usage
//!
//! ```text
//! # Train models from nanopore reads
//! hammerpede train -f primers.fasta -o models/ reads.fastq.gz
//!
//! # Stricter cutoff, FASTA input
//! hammerpede train -f primers.fasta -o models/ -i fasta -s 0.9 reads.fasta
//!
//! # Inspect cutoffs as JSON
//! hammerpede cutoffs -f primers.fasta --format json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::align::{AlignmentMode, BioAligner, ScoreConfig, WildcardScores};
use crate::detection::{
    CalibrationKind, CalibrationPolicy, QueryRegistry, SelfAlignment, ShuffledNull,
};
use crate::utils::validation::{validate_fraction, validate_nonzero};

pub mod cutoffs;
pub mod train;

#[derive(Parser, Debug)]
#[command(name = "hammerpede")]
#[command(version)]
#[command(about = "Train strand-specific profile HMMs of primers from long reads")]
#[command(
    long_about = "hammerpede finds primer and barcode occurrences in long reads by local alignment and trains one profile HMM per query strand from the matched read fragments.\n\nThe fragments of every query are aligned with spoa, each alignment is turned into a model with hmmbuild, and all models are pressed into a single HMMER database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect queries in reads and build the model database
    Train(train::TrainArgs),

    /// Print the calibrated score cutoff of every query
    Cutoffs(cutoffs::CutoffsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Query, alignment and calibration options shared by all commands
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// FASTA with primer or barcode sequences
    #[arg(short = 'f', long = "queries", required = true)]
    pub queries: PathBuf,

    /// Alignment parameters: match,mismatch,gap_open,gap_extend
    #[arg(
        short = 'g',
        long = "align-params",
        default_value = "1,-1,1,1",
        allow_hyphen_values = true
    )]
    pub align_params: ScoreConfig,

    /// Score of the N wildcard against any base
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub wildcard_score: i32,

    /// Score of the X modified-base marker against any base
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub modified_score: i32,

    /// Which parts of a query may stay unaligned
    #[arg(long, value_enum, default_value = "overlap")]
    pub mode: AlignmentMode,

    /// Score cutoff as a fraction of the self-alignment score (or null quantile)
    #[arg(short = 's', long = "cutoff", default_value_t = 0.8)]
    pub cutoff: f64,

    /// How cutoffs are calibrated
    #[arg(long, value_enum, default_value = "self")]
    pub calibration: CalibrationKind,

    /// Shuffled decoys per query for shuffled calibration
    #[arg(long, default_value_t = 100)]
    pub samples: usize,

    /// Random seed for shuffled calibration
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl QueryArgs {
    #[must_use]
    pub fn wildcards(&self) -> WildcardScores {
        WildcardScores {
            ambiguous: self.wildcard_score,
            modified: self.modified_score,
        }
    }

    #[must_use]
    pub fn aligner(&self) -> BioAligner {
        BioAligner::with_wildcards(&self.align_params, self.wildcards()).with_mode(self.mode)
    }

    /// Validated calibration policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the cutoff fraction is outside (0, 1] or no shuffled
    /// samples are requested.
    pub fn policy(&self) -> anyhow::Result<Box<dyn CalibrationPolicy>> {
        let fraction = validate_fraction(self.cutoff)?;
        Ok(match self.calibration {
            CalibrationKind::SelfAlignment => Box::new(SelfAlignment::new(fraction)),
            CalibrationKind::Shuffled => {
                let samples = validate_nonzero(self.samples, "--samples")?;
                Box::new(ShuffledNull::new(fraction, samples, self.seed))
            }
        })
    }

    /// Load the queries and calibrate both orientations.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the query file cannot be
    /// loaded.
    pub fn load_registry(&self, aligner: &BioAligner) -> anyhow::Result<QueryRegistry> {
        let policy = self.policy()?;
        let registry = QueryRegistry::load(&self.queries, policy.as_ref(), aligner)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from([
            "hammerpede",
            "train",
            "-f",
            "primers.fasta",
            "-o",
            "out",
            "reads.fastq",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.query.align_params, ScoreConfig::new(1, -1, 1, 1).unwrap());
        assert_eq!(args.query.mode, AlignmentMode::Overlap);
        assert_eq!(args.query.calibration, CalibrationKind::SelfAlignment);
        assert!((args.query.cutoff - 0.8).abs() < f64::EPSILON);
        assert_eq!(args.query.policy().unwrap().name(), "self");
    }

    #[test]
    fn test_input_format_parsed_case_insensitively() {
        use crate::core::types::ReadFormat;

        let cli = Cli::try_parse_from([
            "hammerpede",
            "train",
            "-i",
            "FA",
            "-f",
            "primers.fasta",
            "-o",
            "out",
            "reads.fasta",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.input_format, ReadFormat::Fasta);

        let err = Cli::try_parse_from([
            "hammerpede",
            "train",
            "-i",
            "bam",
            "-f",
            "primers.fasta",
            "-o",
            "out",
            "reads.bam",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Unknown input format 'bam'"));
    }

    #[test]
    fn test_malformed_align_params_rejected_by_parser() {
        let result = Cli::try_parse_from([
            "hammerpede",
            "cutoffs",
            "-f",
            "primers.fasta",
            "-g",
            "1,-1,1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_wildcard_score() {
        let cli = Cli::try_parse_from([
            "hammerpede",
            "cutoffs",
            "-f",
            "primers.fasta",
            "--wildcard-score",
            "-1",
        ])
        .unwrap();
        let Commands::Cutoffs(args) = cli.command else {
            panic!("expected cutoffs");
        };
        assert_eq!(args.query.wildcards().ambiguous, -1);
    }

    #[test]
    fn test_shuffled_policy_requires_samples() {
        let cli = Cli::try_parse_from([
            "hammerpede",
            "cutoffs",
            "-f",
            "primers.fasta",
            "--calibration",
            "shuffled",
            "--samples",
            "0",
        ])
        .unwrap();
        let Commands::Cutoffs(args) = cli.command else {
            panic!("expected cutoffs");
        };
        assert!(args.query.policy().is_err());
    }
}
