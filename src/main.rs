use letterboxd_merge::{Config, Processor, RunOptions};

use clap::{CommandFactory, Parser};
use std::{path::PathBuf, process::ExitCode};
use tracing::error;

/// Process Letterboxd ZIP exports and generate JSON with movie data
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to ZIP export file
    #[arg(long)]
    zip: Option<PathBuf>,

    /// Custom username (optional, only used with --zip)
    #[arg(long)]
    user: Option<String>,

    /// Output JSON file path [default: web/data.json]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Fetch movie posters from Letterboxd
    #[arg(long)]
    fetch_posters: bool,

    /// Process every ZIP export in a directory
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Configuration file [default: config/config.toml, if present]
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.zip.is_none() && cli.batch.is_none() {
        if let Err(err) = Cli::command().print_help() {
            error!("Could not print usage: {}", err);
        }
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let options = RunOptions::new(&config, cli.output, cli.fetch_posters);
    let mut processor = match Processor::new(config, options) {
        Ok(processor) => processor,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = if let Some(zip) = &cli.zip {
        processor.process_zip(zip, cli.user.as_deref()).await.map(|_| ())
    } else if let Some(batch) = &cli.batch {
        processor.process_batch(batch).await.map(|_| ())
    } else {
        Ok(())
    };

    if let Err(err) = result {
        error!("{}", err);
        return ExitCode::FAILURE;
    }

    println!("\n{}\n", processor.summary());

    ExitCode::SUCCESS
}
