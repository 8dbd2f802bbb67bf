//! Streaming detection of queries in reads.
//!
//! The pipeline moves through `Initializing -> Streaming -> Finalizing -> Done`:
//! collections are opened for every registered query, reads are classified
//! batch by batch, and the finished collections are handed to a
//! [`FinalizeStage`] (consensus and model building).
//!
//! Reads within a batch are classified in parallel. Results are collected in
//! read order before being appended, so the content of every
//! [`FragmentCollection`] is independent of thread scheduling.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::align::{AlignError, PairwiseAligner};
use crate::core::query::Query;
use crate::core::sequence::SequenceRecord;
use crate::core::types::QueryKey;
use crate::detection::classifier::classify;
use crate::detection::registry::QueryRegistry;
use crate::detection::DetectionError;
use crate::parsing::ParseError;

/// Default minimum length of an accepted fragment
pub const DEFAULT_MIN_FRAGMENT_LENGTH: usize = 4;

/// Default number of reads classified per parallel batch
pub const DEFAULT_BATCH_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Initializing,
    Streaming,
    Finalizing,
    Done,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::Streaming => "streaming",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Accepted matches shorter than this are dropped
    pub min_fragment_length: usize,

    /// Reads per parallel batch
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_fragment_length: DEFAULT_MIN_FRAGMENT_LENGTH,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Matched region of a read
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// `<read>_<start>:<end>`
    pub name: String,
    pub sequence: Vec<u8>,
    pub score: i32,
    /// Zero-based position of the source read in the input
    pub read_index: u64,
}

/// Accepted fragments of one query orientation, in read order
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentCollection {
    key: QueryKey,
    fragments: Vec<Fragment>,
}

impl FragmentCollection {
    #[must_use]
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            fragments: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// (name, sequence) pairs for writing
    pub fn records(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.fragments
            .iter()
            .map(|f| (f.name.as_str(), f.sequence.as_slice()))
    }

    fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }
}

/// Consumer of the finished collections
pub trait FinalizeStage {
    type Output;

    /// Build artifacts from the collections, which are in registry order.
    ///
    /// # Errors
    ///
    /// Returns a `DetectionError` if an artifact cannot be produced.
    fn finalize(&self, collections: &[FragmentCollection]) -> Result<Self::Output, DetectionError>;
}

pub struct DetectionPipeline<'a> {
    registry: &'a QueryRegistry,
    aligner: &'a dyn PairwiseAligner,
    config: PipelineConfig,
    state: PipelineState,
    collections: Vec<FragmentCollection>,
    reads_processed: u64,
}

impl<'a> DetectionPipeline<'a> {
    /// Open one empty collection per registered query and start streaming
    #[must_use]
    pub fn new(
        registry: &'a QueryRegistry,
        aligner: &'a dyn PairwiseAligner,
        config: PipelineConfig,
    ) -> Self {
        let mut pipeline = Self {
            registry,
            aligner,
            config,
            state: PipelineState::Initializing,
            collections: Vec::new(),
            reads_processed: 0,
        };
        pipeline.collections = registry
            .iter()
            .map(|query| FragmentCollection::new(query.key()))
            .collect();
        pipeline.state = PipelineState::Streaming;
        debug!("Opened {} fragment collections", pipeline.collections.len());
        pipeline
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[must_use]
    pub fn reads_processed(&self) -> u64 {
        self.reads_processed
    }

    /// Collections in registry order
    #[must_use]
    pub fn collections(&self) -> &[FragmentCollection] {
        &self.collections
    }

    #[must_use]
    pub fn collection(&self, key: &QueryKey) -> Option<&FragmentCollection> {
        self.collections.iter().find(|c| c.key() == key)
    }

    fn expect_state(&self, expected: PipelineState) -> Result<(), DetectionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DetectionError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Classify a batch of reads against every query.
    ///
    /// # Errors
    ///
    /// Returns `DetectionError::Align` on the first aligner contract violation,
    /// after which the run must be abandoned, or `DetectionError::InvalidState`
    /// outside the streaming state.
    pub fn process_batch(&mut self, reads: &[SequenceRecord]) -> Result<(), DetectionError> {
        self.expect_state(PipelineState::Streaming)?;

        let queries = self.registry.queries();
        let aligner = self.aligner;
        let min_len = self.config.min_fragment_length;
        let first_index = self.reads_processed;

        let hits: Vec<Vec<(usize, Fragment)>> = reads
            .par_iter()
            .enumerate()
            .map(|(offset, read)| {
                classify_read(read, first_index + offset as u64, queries, aligner, min_len)
            })
            .collect::<Result<_, AlignError>>()?;

        for (query_idx, fragment) in hits.into_iter().flatten() {
            self.collections[query_idx].push(fragment);
        }
        self.reads_processed += reads.len() as u64;
        Ok(())
    }

    /// Classify every read of `reads` in batches, calling `on_batch` after each.
    ///
    /// # Errors
    ///
    /// Returns the first read decoding or classification error.
    pub fn stream<I, F>(&mut self, reads: I, mut on_batch: F) -> Result<u64, DetectionError>
    where
        I: IntoIterator<Item = Result<SequenceRecord, ParseError>>,
        F: FnMut(&[SequenceRecord]),
    {
        let mut reads = reads.into_iter();
        let batch_size = self.config.batch_size.max(1);
        loop {
            let batch: Vec<SequenceRecord> =
                reads.by_ref().take(batch_size).collect::<Result<_, _>>()?;
            if batch.is_empty() {
                break;
            }
            self.process_batch(&batch)?;
            on_batch(&batch);
        }

        info!(
            "Classified {} reads against {} queries",
            self.reads_processed,
            self.registry.len()
        );
        Ok(self.reads_processed)
    }

    /// Hand the collections to `stage` and finish the run.
    ///
    /// # Errors
    ///
    /// Returns `DetectionError::InvalidState` unless streaming, and any error of
    /// the stage. A failed stage leaves the pipeline in the finalizing state.
    pub fn finalize<S: FinalizeStage>(&mut self, stage: &S) -> Result<S::Output, DetectionError> {
        self.expect_state(PipelineState::Streaming)?;
        self.state = PipelineState::Finalizing;

        for collection in &self.collections {
            debug!("{}: {} fragments", collection.key(), collection.len());
        }
        let output = stage.finalize(&self.collections)?;

        self.state = PipelineState::Done;
        Ok(output)
    }
}

/// Classify one read against all queries; returns (query index, fragment) hits
fn classify_read(
    read: &SequenceRecord,
    read_index: u64,
    queries: &[Query],
    aligner: &dyn PairwiseAligner,
    min_len: usize,
) -> Result<Vec<(usize, Fragment)>, AlignError> {
    let mut hits = Vec::new();
    for (query_idx, query) in queries.iter().enumerate() {
        let Some(m) = classify(&read.sequence, &query.sequence, query.cutoff, aligner)?.accepted()
        else {
            continue;
        };
        if m.len() < min_len {
            continue;
        }
        hits.push((
            query_idx,
            Fragment {
                name: format!("{}_{}:{}", read.name, m.reference_start, m.reference_end),
                sequence: m.sequence,
                score: m.score,
                read_index,
            },
        ));
    }
    Ok(hits)
}
