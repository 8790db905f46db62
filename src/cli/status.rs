//! Status command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{progress_path, rule};
use crate::domain::{Config, Recommendation, ValidationSummary};
use crate::store::{ReviewProgress, ValidationStore};

#[derive(Args)]
pub struct StatusArgs {
    /// Validation results written by `validate`
    #[arg(value_name = "VALIDATION_JSON")]
    pub validation_json: PathBuf,

    /// Review progress file
    #[arg(long, value_name = "FILE")]
    pub progress: Option<PathBuf>,
}

pub fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let store = ValidationStore::load(&args.validation_json)?;
    let summary = ValidationSummary::from_records(&store.results);

    println!("📊 Current Status:");
    println!("   Total scales: {}", summary.total);
    println!("   ✅ KEEP: {}", summary.keep);
    println!("   ⚠️  REVIEW: {}", summary.review);
    println!("   ❌ REMOVE: {}", summary.remove);

    for (rec, heading) in [
        (Recommendation::Review, "⚠️  Scales still under REVIEW"),
        (Recommendation::Remove, "❌ Scales marked REMOVE"),
    ] {
        let records: Vec<_> = store.with_recommendation(rec).collect();
        if records.is_empty() {
            continue;
        }
        println!();
        println!("{} ({}):", heading, records.len());
        for record in records {
            println!("   - {} ({}): {:.2}", record.label(), record.scale_name, record.quality_score);
        }
    }

    // Read-only: status never creates or rewrites the progress file.
    let progress_file = progress_path(args.progress.as_deref(), config);
    println!();
    println!("{}", rule('-'));
    if progress_file.exists() {
        let text = std::fs::read_to_string(&progress_file)
            .with_context(|| format!("Failed to read {}", progress_file.display()))?;
        match serde_json::from_str::<ReviewProgress>(&text) {
            Ok(progress) => {
                let review = store.review_names();
                let reviewed =
                    review.iter().filter(|n| progress.reviewed_scales.contains(*n)).count();
                println!("📝 Review progress ({}):", progress_file.display());
                println!("   Reviewed: {}/{}", reviewed, review.len());
                println!("   Approved: {}", progress.approved_sources.len());
                println!("   Rejected: {}", progress.rejected_scales.len());
                println!("   Remaining: {}", review.len() - reviewed);
                println!("   Last updated: {}", progress.last_updated.as_deref().unwrap_or("Never"));
            }
            Err(e) => {
                tracing::warn!("Progress file {} is corrupt: {}", progress_file.display(), e);
                println!("📝 Review progress: unreadable ({})", progress_file.display());
            }
        }
    } else {
        println!("📝 Review progress: not started ({} not found)", progress_file.display());
    }
    Ok(())
}
