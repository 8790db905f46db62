//! Report command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::domain::DEFAULT_REPORT_FILE;
use crate::render::{write_report, ReportOptions};
use crate::store::ValidationStore;

#[derive(Args)]
pub struct ReportArgs {
    /// Validation results to report on
    #[arg(value_name = "VALIDATION_JSON")]
    pub validation_json: PathBuf,

    /// Markdown output path
    #[arg(short, long, value_name = "MD", default_value = DEFAULT_REPORT_FILE)]
    pub output: PathBuf,

    /// Omit the generation timestamp (for reproducible output)
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: ReportArgs) -> Result<()> {
    let store = ValidationStore::load(&args.validation_json)?;
    let options = ReportOptions { include_timestamp: !args.no_timestamp, ..ReportOptions::default() };
    write_report(&args.output, &store, &options)?;
    println!("✅ Validation report generated: {}", args.output.display());
    println!("📊 {} scales ({} KEEP)", store.summary.total, store.summary.keep);
    Ok(())
}
