use clap::Parser;
use tracing_subscriber::EnvFilter;

mod align;
mod cli;
mod core;
mod detection;
mod external;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("hammerpede=debug,info")
    } else {
        EnvFilter::new("hammerpede=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Train(args) => {
            cli::train::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Cutoffs(args) => {
            cli::cutoffs::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
