//! Consensus and model building over the finished fragment collections.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::types::QueryKey;
use crate::detection::{DetectionError, FinalizeStage, FragmentCollection};
use crate::external::{Hmmer, Spoa};
use crate::parsing::fasta::write_fasta_file;

/// Artifacts produced for one query orientation
#[derive(Debug, Clone, Serialize)]
pub struct QueryModel {
    pub key: QueryKey,
    pub hits: PathBuf,
    pub fragments: usize,
    /// `None` when no fragments were collected
    pub alignment: Option<PathBuf>,
    pub model: Option<PathBuf>,
}

/// Result of the finalize stage
#[derive(Debug, Clone, Serialize)]
pub struct ModelSet {
    pub queries: Vec<QueryModel>,
    /// `None` when no query collected any fragment
    pub database: Option<PathBuf>,
}

/// Writes hit files, builds consensus alignments and profile models, and
/// assembles them into one indexed database.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    outdir: PathBuf,
    database: PathBuf,
    spoa: Spoa,
    hmmer: Hmmer,
}

impl ModelBuilder {
    pub fn new(outdir: impl Into<PathBuf>, database: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
            database: database.into(),
            spoa: Spoa::default(),
            hmmer: Hmmer::default(),
        }
    }

    #[must_use]
    pub fn with_tools(mut self, spoa: Spoa, hmmer: Hmmer) -> Self {
        self.spoa = spoa;
        self.hmmer = hmmer;
        self
    }

    /// `<outdir>/<query stem>.hmm`
    #[must_use]
    pub fn database_path(outdir: &Path, query_file: &Path) -> PathBuf {
        let name = query_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // `primers.fasta.gz` gives `primers.hmm`
        let name = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bgz"))
            .unwrap_or(&name);
        let stem = Path::new(name)
            .file_stem()
            .map_or_else(|| "queries".to_string(), |s| s.to_string_lossy().into_owned());
        outdir.join(format!("{stem}.hmm"))
    }

    fn hits_path(&self, key: &QueryKey) -> PathBuf {
        self.outdir.join(format!("hits_{}.fasta", key.file_stem()))
    }

    fn alignment_path(&self, key: &QueryKey) -> PathBuf {
        self.outdir.join(format!("spoa_aln_hits_{}.fasta", key.file_stem()))
    }

    fn model_path(&self, key: &QueryKey) -> PathBuf {
        self.outdir.join(format!("spoa_aln_hits_{}.hmm", key.file_stem()))
    }
}

impl FinalizeStage for ModelBuilder {
    type Output = ModelSet;

    fn finalize(&self, collections: &[FragmentCollection]) -> Result<ModelSet, DetectionError> {
        let mut queries = Vec::with_capacity(collections.len());
        for collection in collections {
            let hits = self.hits_path(collection.key());
            write_fasta_file(&hits, collection.records())?;
            queries.push(QueryModel {
                key: collection.key().clone(),
                hits,
                fragments: collection.len(),
                alignment: None,
                model: None,
            });
        }

        for query in queries.iter().filter(|q| q.fragments == 0) {
            warn!("No fragments collected for {}, skipping its model", query.key);
        }

        // Each query owns its files, so consensus runs in parallel
        let alignments: Vec<Option<PathBuf>> = queries
            .par_iter()
            .map(|query| -> Result<Option<PathBuf>, DetectionError> {
                if query.fragments == 0 {
                    return Ok(None);
                }
                let alignment = self.alignment_path(&query.key);
                let rows = self.spoa.build_consensus(&query.hits, &alignment)?;
                info!("{}: aligned {} fragments", query.key, rows);
                Ok(Some(alignment))
            })
            .collect::<Result<_, DetectionError>>()?;

        let mut models = Vec::new();
        for (query, alignment) in queries.iter_mut().zip(alignments) {
            let Some(alignment) = alignment else {
                continue;
            };
            let model = self.model_path(&query.key);
            self.hmmer.build_model(&query.key, &alignment, &model)?;
            models.push(model.clone());
            query.alignment = Some(alignment);
            query.model = Some(model);
        }

        if models.is_empty() {
            warn!("No query collected any fragment; no model database was built");
            return Ok(ModelSet {
                queries,
                database: None,
            });
        }

        self.hmmer.build_database(&models, &self.database)?;
        info!("Wrote {} models to {}", models.len(), self.database.display());
        Ok(ModelSet {
            queries,
            database: Some(self.database.clone()),
        })
    }
}
