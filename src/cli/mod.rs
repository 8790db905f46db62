//! Command-line interface for scale-curator
//!
//! One subcommand per curation workflow: extraction, validation runs, the
//! interactive review, citation import and the cleanup/prune passes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::load_config;

mod cleanup;
mod import;
mod list;
mod prune;
mod report;
mod review;
mod search;
mod status;
mod utils;
mod validate;

/// Validate, review and cite the musical scales of a JavaScript theory engine
#[derive(Parser)]
#[command(name = "scale-curator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML or YAML); defaults to scale-curator.toml if present
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the scales defined in a JavaScript engine file
    List(list::ListArgs),

    /// Search evidence for every scale and write the validation results
    Validate(validate::ValidateArgs),

    /// Run the evidence search for a single scale
    Search(search::SearchArgs),

    /// Interactively review the next batch of REVIEW scales
    Review(review::ReviewArgs),

    /// Import KEEP and REVIEW results into the scaleCitations object
    Import(import::ImportArgs),

    /// Apply a promote/remove plan to the validation results
    Cleanup(cleanup::CleanupArgs),

    /// Remove every non-KEEP scale from the JavaScript engine file
    Prune(prune::PruneArgs),

    /// Regenerate the Markdown validation report
    Report(report::ReportArgs),

    /// Show validation counts and review progress
    Status(status::StatusArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    match cli.command {
        Commands::List(args) => list::run(args),
        Commands::Validate(args) => validate::run(args, &config),
        Commands::Search(args) => search::run(args, &config),
        Commands::Review(args) => review::run(args, &config),
        Commands::Import(args) => import::run(args, &config),
        Commands::Cleanup(args) => cleanup::run(args, &config),
        Commands::Prune(args) => prune::run(args),
        Commands::Report(args) => report::run(args),
        Commands::Status(args) => status::run(args, &config),
    }
}
