//! # hammerpede
//!
//! Train strand-specific profile HMMs of primers and barcodes from long reads.
//!
//! Primer and barcode sequences are searched in every read on both strands.
//! Matched read regions are collected per query strand, aligned into a
//! consensus with `spoa` and turned into profile HMMs with `hmmbuild`; all
//! models are pressed into one HMMER database with `hmmpress`.
//!
//! ## Detection
//!
//! Each query gets a score cutoff from a calibration policy (by default a
//! fraction of its self-alignment score). A read region is accepted when its
//! alignment score reaches the cutoff scaled by the fraction of the query the
//! alignment covers, so primers truncated at a read end are still found.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hammerpede::{
//!     AlignmentMode, BioAligner, DetectionPipeline, PipelineConfig, QueryRegistry, ReadFormat,
//!     ReadSource, ScoreConfig, SelfAlignment,
//! };
//! use std::path::Path;
//!
//! let aligner = BioAligner::new(&ScoreConfig::default()).with_mode(AlignmentMode::Overlap);
//! let registry =
//!     QueryRegistry::load(Path::new("primers.fasta"), &SelfAlignment::new(0.8), &aligner).unwrap();
//!
//! let reads = ReadSource::open(Path::new("reads.fastq"), ReadFormat::Fastq).unwrap();
//! let mut pipeline = DetectionPipeline::new(&registry, &aligner, PipelineConfig::default());
//! pipeline.stream(reads, |_| {}).unwrap();
//!
//! for collection in pipeline.collections() {
//!     println!("{}: {} fragments", collection.key(), collection.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`align`]: scoring configuration, the aligner contract and its rust-bio backend
//! - [`core`]: orientations, query keys, queries and sequence records
//! - [`detection`]: calibration, classification, query registry and pipeline
//! - [`parsing`]: FASTA/FASTQ input and FASTA output
//! - [`external`]: spoa and HMMER wrappers and the model-building stage
//! - [`cli`]: command-line interface implementation

pub mod align;
pub mod cli;
pub mod core;
pub mod detection;
pub mod external;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use align::{AlignmentMode, AlignmentResult, BioAligner, PairwiseAligner, ScoreConfig};
pub use core::query::Query;
pub use core::sequence::{reverse_complement, SequenceRecord};
pub use core::types::*;
pub use detection::{
    classify, CalibrationPolicy, DetectionError, DetectionPipeline, FragmentCollection,
    MatchVerdict, PipelineConfig, QueryRegistry, SelfAlignment, ShuffledNull,
};
pub use external::{ModelBuilder, ToolError};
pub use parsing::reads::ReadSource;
