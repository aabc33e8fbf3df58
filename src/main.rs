use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use defect_classifier::{load_config, run, RunOutcome};

/// Classify surface defects (patches vs scratches) with an MLP or KNN.
#[derive(Parser, Debug)]
#[command(name = "defect-classifier", version, about, long_about = None)]
struct Cli {
    /// JSON run configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli.config)?;

    match run(&config)? {
        RunOutcome::Trained { accuracy, artifact } => {
            println!("MLP prediction accuracy: {accuracy}");
            println!("model saved to {}", artifact.display());
        }
        RunOutcome::Evaluated { accuracy } => println!("MLP prediction accuracy: {accuracy}"),
        RunOutcome::Knn { accuracy } => println!("KNN prediction accuracy: {accuracy}"),
        RunOutcome::Skipped { .. } => {}
    }

    Ok(())
}
