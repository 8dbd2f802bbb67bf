//! Calibrated queries keyed by (identifier, orientation).

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::align::PairwiseAligner;
use crate::core::query::Query;
use crate::core::sequence::{normalize, reverse_complement, SequenceRecord};
use crate::core::types::{Orientation, QueryKey};
use crate::detection::calibration::CalibrationPolicy;
use crate::detection::DetectionError;
use crate::parsing::fasta::read_fasta_file;
use crate::utils::validation::MAX_QUERY_LENGTH;

/// All queries of a run, in input order with the forward orientation of each
/// record immediately followed by its reverse complement.
///
/// Read-only once loaded; shared by reference across worker threads.
#[derive(Debug, Clone, Default)]
pub struct QueryRegistry {
    queries: Vec<Query>,
    index: HashMap<QueryKey, usize>,
}

impl QueryRegistry {
    /// Load and calibrate queries from a FASTA file.
    ///
    /// # Errors
    ///
    /// Returns `DetectionError::Parse` if the file cannot be read, and the errors
    /// of [`QueryRegistry::from_records`] for invalid records.
    pub fn load(
        path: &Path,
        policy: &dyn CalibrationPolicy,
        aligner: &dyn PairwiseAligner,
    ) -> Result<Self, DetectionError> {
        let records = read_fasta_file(path)?;
        let registry = Self::from_records(records, policy, aligner)?;
        info!(
            "Loaded {} queries ({} orientations) from {}",
            registry.len() / 2,
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Register both orientations of every record and calibrate each.
    ///
    /// # Errors
    ///
    /// Returns `DetectionError::EmptyQuery` for a zero-length sequence,
    /// `DetectionError::QueryTooLong` above the length limit, and
    /// `DetectionError::DuplicateQuery` when an identifier repeats.
    pub fn from_records<I>(
        records: I,
        policy: &dyn CalibrationPolicy,
        aligner: &dyn PairwiseAligner,
    ) -> Result<Self, DetectionError>
    where
        I: IntoIterator<Item = SequenceRecord>,
    {
        let mut registry = Self::default();

        for record in records {
            if record.is_empty() {
                return Err(DetectionError::EmptyQuery(record.name));
            }
            if record.len() > MAX_QUERY_LENGTH {
                return Err(DetectionError::QueryTooLong {
                    length: record.len(),
                    id: record.name,
                });
            }

            let forward = normalize(&record.sequence);
            let reverse = reverse_complement(&forward);
            for (orientation, sequence) in [
                (Orientation::Forward, forward),
                (Orientation::ReverseComplement, reverse),
            ] {
                let cutoff = policy.cutoff(&sequence, aligner);
                debug!(
                    "Calibrated {}{} ({} bp): cutoff {:.2} [{}]",
                    record.name,
                    orientation,
                    sequence.len(),
                    cutoff,
                    policy.name()
                );
                registry.insert(Query::new(record.name.clone(), orientation, sequence, cutoff))?;
            }
        }

        Ok(registry)
    }

    fn insert(&mut self, query: Query) -> Result<(), DetectionError> {
        let key = query.key();
        if self.index.contains_key(&key) {
            return Err(DetectionError::DuplicateQuery(key.id));
        }
        self.index.insert(key, self.queries.len());
        self.queries.push(query);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &QueryKey) -> Option<&Query> {
        self.index.get(key).map(|&idx| &self.queries[idx])
    }

    /// Queries in registration order
    #[must_use]
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Query> {
        self.queries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl<'a> IntoIterator for &'a QueryRegistry {
    type Item = &'a Query;
    type IntoIter = std::slice::Iter<'a, Query>;

    fn into_iter(self) -> Self::IntoIter {
        self.queries.iter()
    }
}
