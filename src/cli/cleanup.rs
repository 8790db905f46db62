//! Cleanup command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::{progress_path, rule};
use crate::domain::Config;
use crate::store::{CleanupPlan, ReviewTracker, ValidationStore};
use crate::utils::ensure_exists;

#[derive(Args)]
pub struct CleanupArgs {
    /// Validation results to clean
    #[arg(value_name = "VALIDATION_JSON")]
    pub validation_json: PathBuf,

    /// Plan file (TOML, YAML or JSON) with `remove` and `promote` sections
    #[arg(long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Write the cleaned results here instead of in place
    #[arg(short, long, value_name = "JSON")]
    pub output: Option<PathBuf>,

    /// Review progress file to mark promoted scales as reviewed
    #[arg(long, value_name = "FILE")]
    pub progress: Option<PathBuf>,
}

pub fn run(args: CleanupArgs, config: &Config) -> Result<()> {
    ensure_exists(&args.validation_json, "Validation JSON file")?;
    let plan = CleanupPlan::load(&args.plan)?;
    let mut store = ValidationStore::load(&args.validation_json)?;

    if plan.is_empty() {
        println!("Cleanup plan {} is empty; nothing to do", args.plan.display());
        return Ok(());
    }

    println!("❌ Removing {} scales listed in the plan...", plan.remove.len());
    println!("✅ Promoting {} scales to KEEP...", plan.promote.len());
    let outcome = plan.apply(&mut store);
    for name in &outcome.removed {
        println!("   Removed: {}", name);
    }
    for name in &outcome.promoted {
        println!("   Promoted: {}", name);
    }

    let output = args.output.clone().unwrap_or_else(|| args.validation_json.clone());
    store.save(&output)?;

    // Promotions only touch progress when the file already exists, or was named.
    let progress_file = progress_path(args.progress.as_deref(), config);
    if !outcome.promoted.is_empty() && (args.progress.is_some() || progress_file.exists()) {
        let mut tracker = ReviewTracker::open(&progress_file, &store)?;
        for name in &outcome.promoted {
            tracker.record_promotion(name)?;
        }
    }

    let summary = outcome.summary;
    println!();
    println!("{}", rule('-'));
    println!("📊 Summary of changes:");
    println!("   Original scales: {}", outcome.original_total);
    println!("   Removed: {}", outcome.removed.len());
    println!("   Promoted: {}", outcome.promoted.len());
    if !outcome.unmatched.is_empty() {
        println!("   Not found: {}", outcome.unmatched.join(", "));
    }
    println!("   Final total: {}", summary.total);
    println!("   ✅ Verified: {}", summary.keep);
    println!("   ⚠️  Under review: {}", summary.review);
    println!("   ❌ To remove: {}", summary.remove);
    println!();
    println!("💾 Saved to: {}", output.display());
    Ok(())
}
