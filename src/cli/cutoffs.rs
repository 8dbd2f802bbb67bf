//! Cutoffs command - calibrate the queries without scanning any reads.
//!
//! Useful to pick a cutoff fraction before a long training run.

use clap::Args;

use crate::cli::{OutputFormat, QueryArgs};
use crate::detection::QueryRegistry;

/// Arguments for the cutoffs command
#[derive(Args, Debug)]
pub struct CutoffsArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Execute the cutoffs command
///
/// # Errors
///
/// Returns an error if the options are invalid or the queries cannot be loaded.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: CutoffsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let aligner = args.query.aligner();
    let registry = args.query.load_registry(&aligner)?;

    if verbose {
        eprintln!(
            "Calibrated {} query strands from {} (alignment {}, {:?} mode)",
            registry.len(),
            args.query.queries.display(),
            args.query.align_params,
            args.query.mode,
        );
    }

    match format {
        OutputFormat::Text => print_text(&registry),
        OutputFormat::Json => print_json(&registry)?,
        OutputFormat::Tsv => print_tsv(&registry),
    }

    Ok(())
}

fn print_text(registry: &QueryRegistry) {
    for query in registry {
        println!(
            "{}{}\tlength {}\tcutoff {:.2} ({:.3} per base)",
            query.id,
            query.orientation,
            query.len(),
            query.cutoff,
            query.score_density()
        );
    }
}

fn print_json(registry: &QueryRegistry) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = registry
        .iter()
        .map(|query| {
            serde_json::json!({
                "id": query.id,
                "orientation": query.orientation,
                "sequence": String::from_utf8_lossy(&query.sequence),
                "length": query.len(),
                "cutoff": query.cutoff,
                "score_density": query.score_density(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(registry: &QueryRegistry) {
    println!("id\tstrand\tlength\tcutoff\tscore_density");
    for query in registry {
        println!(
            "{}\t{}\t{}\t{:.4}\t{:.4}",
            query.id,
            query.orientation,
            query.len(),
            query.cutoff,
            query.score_density()
        );
    }
}
