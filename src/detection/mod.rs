//! Query detection in long reads.
//!
//! - [`calibration`]: per-query score cutoffs
//! - [`classifier`]: accept or reject one (read, query) alignment
//! - [`registry`]: calibrated forward and reverse-complement queries
//! - [`pipeline`]: streaming classification into per-query fragment collections
//!
//! ## Acceptance rule
//!
//! A local match covering `m` of the query's `n` bases is accepted when its
//! score reaches `cutoff * m / n`. The cutoff is scaled by the covered
//! fraction, so a query truncated at a read boundary can still be detected.

pub mod calibration;
pub mod classifier;
pub mod pipeline;
pub mod registry;

use thiserror::Error;

use crate::align::AlignError;
use crate::external::ToolError;
use crate::parsing::ParseError;

pub use calibration::{CalibrationKind, CalibrationPolicy, SelfAlignment, ShuffledNull};
pub use classifier::{classify, Match, MatchVerdict};
pub use pipeline::{
    DetectionPipeline, FinalizeStage, Fragment, FragmentCollection, PipelineConfig, PipelineState,
};
pub use registry::QueryRegistry;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Query '{0}' has an empty sequence")]
    EmptyQuery(String),

    #[error("Query '{id}' is {length} bases long, exceeding the maximum supported length")]
    QueryTooLong { id: String, length: usize },

    #[error("Duplicate query identifier '{0}'")]
    DuplicateQuery(String),

    #[error("Alignment error: {0}")]
    Align(#[from] AlignError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("External tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline is {actual}, expected {expected}")]
    InvalidState {
        expected: PipelineState,
        actual: PipelineState,
    },
}
