//! Train command - detect queries in reads and build the profile-HMM database.
//!
//! Output directory layout:
//!
//! ```text
//! <outdir>/hits_<id>.fasta            forward-strand fragments
//! <outdir>/hits_-<id>.fasta           reverse-strand fragments
//! <outdir>/spoa_aln_hits_<..>.fasta   consensus alignment per strand
//! <outdir>/spoa_aln_hits_<..>.hmm     model per strand
//! <outdir>/<query stem>.hmm           pressed database of all models
//! <outdir>/summary.json               run parameters and per-query counts
//! ```

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use crate::align::{AlignmentMode, ScoreConfig, WildcardScores};
use crate::cli::{OutputFormat, QueryArgs};
use crate::core::types::{Orientation, ReadFormat};
use crate::detection::pipeline::{DEFAULT_BATCH_SIZE, DEFAULT_MIN_FRAGMENT_LENGTH};
use crate::detection::{DetectionPipeline, PipelineConfig, QueryRegistry};
use crate::external::hmmer::{DEFAULT_HMMBUILD, DEFAULT_HMMPRESS};
use crate::external::spoa::DEFAULT_SPOA;
use crate::external::{Hmmer, ModelBuilder, ModelSet, Spoa};
use crate::parsing::is_gzipped;
use crate::parsing::reads::ReadSource;
use crate::utils::validation::{check_output_dir, validate_nonzero};

/// Arguments for the train command
#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Output directory (must not exist)
    #[arg(short = 'o', long = "outdir", required = true)]
    pub outdir: PathBuf,

    /// Read input format: fastq (fq) or fasta (fa)
    #[arg(short = 'i', long = "input-format", default_value = "fastq")]
    pub input_format: ReadFormat,

    /// Reads to search (plain or gzip-compressed)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Drop accepted fragments shorter than this
    #[arg(long, default_value_t = DEFAULT_MIN_FRAGMENT_LENGTH)]
    pub min_length: usize,

    /// Reads classified per parallel batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Worker threads (0 = all cores)
    #[arg(short = 't', long, default_value_t = 0)]
    pub threads: usize,

    /// spoa executable
    #[arg(long, default_value = DEFAULT_SPOA)]
    pub spoa: PathBuf,

    /// hmmbuild executable
    #[arg(long, default_value = DEFAULT_HMMBUILD)]
    pub hmmbuild: PathBuf,

    /// hmmpress executable
    #[arg(long, default_value = DEFAULT_HMMPRESS)]
    pub hmmpress: PathBuf,
}

/// Per-strand line of the run summary
#[derive(Debug, Serialize)]
struct QuerySummary {
    id: String,
    orientation: Orientation,
    length: usize,
    cutoff: f64,
    fragments: usize,
    model: Option<PathBuf>,
}

/// Contents of `summary.json`
#[derive(Debug, Serialize)]
struct RunSummary {
    align_params: ScoreConfig,
    wildcards: WildcardScores,
    mode: AlignmentMode,
    calibration: &'static str,
    cutoff_fraction: f64,
    min_fragment_length: usize,
    reads: u64,
    queries: Vec<QuerySummary>,
    database: Option<PathBuf>,
}

/// Execute the train command
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the output directory
/// exists, an input cannot be read, or an external tool fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: TrainArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    // Fail on configuration before touching the filesystem
    let policy = args.query.policy()?;
    let batch_size = validate_nonzero(args.batch_size, "--batch-size")?;
    check_output_dir(&args.outdir)?;

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("Failed to build thread pool")?;
    }

    let aligner = args.query.aligner();
    let registry = QueryRegistry::load(&args.query.queries, policy.as_ref(), &aligner)
        .with_context(|| format!("Failed to load queries from {}", args.query.queries.display()))?;
    if verbose {
        eprintln!(
            "Loaded {} queries ({} strands), {} calibration, alignment {}",
            registry.len() / 2,
            registry.len(),
            policy.name(),
            args.query.align_params,
        );
    }

    fs::create_dir_all(&args.outdir)
        .with_context(|| format!("Failed to create {}", args.outdir.display()))?;
    debug!("Created output directory {}", args.outdir.display());

    let source = ReadSource::open(&args.input, args.input_format)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let bar = progress_bar(&args.input)?;

    let config = PipelineConfig {
        min_fragment_length: args.min_length,
        batch_size,
    };
    let mut pipeline = DetectionPipeline::new(&registry, &aligner, config);
    let input_format = args.input_format;
    let compressed = is_gzipped(&args.input);
    let reads = pipeline.stream(source, |batch| {
        if compressed {
            bar.inc(batch.len() as u64);
        } else {
            bar.inc(
                batch
                    .iter()
                    .map(|r| input_format.record_size(r.name.len(), r.len()))
                    .sum(),
            );
        }
    })?;
    bar.finish_and_clear();

    let database = ModelBuilder::database_path(&args.outdir, &args.query.queries);
    let builder = ModelBuilder::new(&args.outdir, database).with_tools(
        Spoa::new(&args.spoa),
        Hmmer::new(&args.hmmbuild, &args.hmmpress),
    );
    let models = pipeline.finalize(&builder)?;

    let summary = build_summary(&args, policy.name(), &registry, &models, reads);
    let summary_path = args.outdir.join("summary.json");
    let writer = BufWriter::new(
        File::create(&summary_path)
            .with_context(|| format!("Failed to create {}", summary_path.display()))?,
    );
    serde_json::to_writer_pretty(writer, &summary)?;
    info!("Wrote run summary to {}", summary_path.display());

    match format {
        OutputFormat::Text => print_text(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => print_tsv(&summary),
    }

    Ok(())
}

/// Byte-based bar for plain input, a read-counting spinner for compressed input
fn progress_bar(input: &Path) -> anyhow::Result<ProgressBar> {
    if is_gzipped(input) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} reads")?,
        );
        return Ok(bar);
    }

    let size = fs::metadata(input)
        .with_context(|| format!("Failed to stat {}", input.display()))?
        .len();
    let bar = ProgressBar::new(size);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes}")?,
    );
    Ok(bar)
}

fn build_summary(
    args: &TrainArgs,
    calibration: &'static str,
    registry: &QueryRegistry,
    models: &ModelSet,
    reads: u64,
) -> RunSummary {
    let queries = registry
        .iter()
        .zip(&models.queries)
        .map(|(query, model)| QuerySummary {
            id: query.id.clone(),
            orientation: query.orientation,
            length: query.len(),
            cutoff: query.cutoff,
            fragments: model.fragments,
            model: model.model.clone(),
        })
        .collect();

    RunSummary {
        align_params: args.query.align_params,
        wildcards: args.query.wildcards(),
        mode: args.query.mode,
        calibration,
        cutoff_fraction: args.query.cutoff,
        min_fragment_length: args.min_length,
        reads,
        queries,
        database: models.database.clone(),
    }
}

fn print_text(summary: &RunSummary) {
    println!("Reads processed: {}", summary.reads);
    println!();
    for query in &summary.queries {
        println!(
            "{}{}: {} fragments (cutoff {:.2})",
            query.id,
            query.orientation,
            query.fragments,
            query.cutoff
        );
    }
    println!();
    match &summary.database {
        Some(database) => println!("Model database: {}", database.display()),
        None => println!("No fragments found; no model database was built."),
    }
}

fn print_tsv(summary: &RunSummary) {
    println!("id\tstrand\tlength\tcutoff\tfragments\tmodel");
    for query in &summary.queries {
        println!(
            "{}\t{}\t{}\t{:.4}\t{}\t{}",
            query.id,
            query.orientation,
            query.length,
            query.cutoff,
            query.fragments,
            query
                .model
                .as_ref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string())
        );
    }
}
