//! List command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::format_intervals;
use crate::extract::extract_scales;
use crate::utils::ensure_exists;

#[derive(Args)]
pub struct ListArgs {
    /// JavaScript engine file containing `scales = { ... }`
    #[arg(value_name = "JS_FILE")]
    pub js_file: PathBuf,
}

pub fn run(args: ListArgs) -> Result<()> {
    ensure_exists(&args.js_file, "JavaScript file")?;
    let source = std::fs::read_to_string(&args.js_file)
        .with_context(|| format!("Failed to read {}", args.js_file.display()))?;
    let scales = extract_scales(&source)
        .with_context(|| format!("Cannot extract scales from {}", args.js_file.display()))?;
    if scales.is_empty() {
        bail!("No scales found in {}; refusing to continue", args.js_file.display());
    }

    let width = scales.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    for scale in &scales {
        println!(
            "{:<width$}  {:<28}  {}",
            scale.name,
            scale.display_name,
            format_intervals(&scale.intervals),
            width = width
        );
    }
    println!();
    println!("Total scales: {}", scales.len());
    Ok(())
}
