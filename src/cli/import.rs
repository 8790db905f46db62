//! Import command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::citations::{CitationFile, CitationMerger};
use crate::domain::Config;
use crate::render::render_import_summary;
use crate::store::ValidationStore;
use crate::utils::ensure_exists;

#[derive(Args)]
pub struct ImportArgs {
    /// Validation results written by `validate`
    #[arg(value_name = "VALIDATION_JSON")]
    pub validation_json: PathBuf,

    /// JavaScript engine file containing `scaleCitations = { ... }`
    #[arg(value_name = "JS_FILE")]
    pub js_file: PathBuf,
}

pub fn run(args: ImportArgs, config: &Config) -> Result<()> {
    ensure_exists(&args.validation_json, "Validation JSON file")?;
    ensure_exists(&args.js_file, "JavaScript file")?;

    let store = ValidationStore::load(&args.validation_json)?;
    let mut citations = CitationFile::open(&args.js_file)?;
    let merger = CitationMerger::new(config.citations.verified_threshold);

    let outcome = merger.import(citations.document_mut(), &store.results);
    if outcome.updated == 0 {
        println!("Nothing to import: no KEEP or REVIEW scales in {}", args.validation_json.display());
        return Ok(());
    }
    let backup = citations.save()?;

    println!("{}", render_import_summary(&store, &outcome, config.citations.verified_threshold));
    println!();
    println!("Updated {} (backup: {})", citations.path().display(), backup.display());
    Ok(())
}
