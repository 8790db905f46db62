//! Prune command implementation

use anyhow::{bail, Result};
use clap::Args;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::prune::prune_file;
use crate::store::ValidationStore;
use crate::utils::{backup_path, ensure_exists};

#[derive(Args)]
pub struct PruneArgs {
    /// Validation results; only KEEP scales survive
    #[arg(value_name = "VALIDATION_JSON")]
    pub validation_json: PathBuf,

    /// JavaScript engine file to prune in place
    #[arg(value_name = "JS_FILE")]
    pub js_file: PathBuf,
}

pub fn run(args: PruneArgs) -> Result<()> {
    ensure_exists(&args.validation_json, "Validation JSON file")?;
    ensure_exists(&args.js_file, "JavaScript file")?;

    let store = ValidationStore::load(&args.validation_json)?;
    let keep: HashSet<String> = store.keep_names().into_iter().collect();
    if keep.is_empty() {
        bail!(
            "{} has no KEEP scales; refusing to prune every scale",
            args.validation_json.display()
        );
    }

    let outcome = prune_file(&args.js_file, &keep)?;
    println!("Kept {} scales, removed {}", outcome.scales_kept, outcome.scales_removed.len());
    for name in &outcome.scales_removed {
        println!("   Removed: {}", name);
    }
    match outcome.citations_removed {
        Some(n) => println!("scaleCitations: removed {} entries", n),
        None => println!("scaleCitations: section not present"),
    }
    match outcome.category_names_removed {
        Some(n) => println!("scaleCategories: removed {} names", n),
        None => println!("scaleCategories: section not present"),
    }
    println!("Backup written to {}", backup_path(&args.js_file).display());
    Ok(())
}
