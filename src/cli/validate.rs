//! Validate command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use super::utils::rule;
use crate::classify::{KeywordHeuristic, ScoringStrategy};
use crate::domain::{Config, DEFAULT_REPORT_FILE, DEFAULT_VALIDATION_FILE};
use crate::extract::{extract_scales, ScaleDefinition};
use crate::render::{write_report, ReportOptions};
use crate::search::{DuckDuckGo, EvidenceSearch};
use crate::store::ValidationStore;
use crate::utils::ensure_exists;

#[derive(Args)]
pub struct ValidateArgs {
    /// JavaScript engine file containing `scales = { ... }`
    #[arg(value_name = "JS_FILE")]
    pub js_file: PathBuf,

    /// Validate a random sample of N scales instead of all of them
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Seed for --sample, for reproducible runs
    #[arg(long, value_name = "SEED", requires = "sample")]
    pub seed: Option<u64>,

    /// Where to write the validation results
    #[arg(short, long, value_name = "JSON", default_value = DEFAULT_VALIDATION_FILE)]
    pub output: PathBuf,

    /// Where to write the Markdown report
    #[arg(long, value_name = "MD", default_value = DEFAULT_REPORT_FILE)]
    pub report: PathBuf,
}

pub fn run(args: ValidateArgs, config: &Config) -> Result<()> {
    ensure_exists(&args.js_file, "JavaScript file")?;
    let source = std::fs::read_to_string(&args.js_file)
        .with_context(|| format!("Failed to read {}", args.js_file.display()))?;
    let mut scales = extract_scales(&source)
        .with_context(|| format!("Cannot extract scales from {}", args.js_file.display()))?;
    if scales.is_empty() {
        bail!("No scales found in {}; refusing to continue", args.js_file.display());
    }
    println!("Found {} scales in {}", scales.len(), args.js_file.display());

    if let Some(n) = args.sample {
        scales = sample_scales(scales, n, args.seed);
        println!("Validating a sample of {} scales", scales.len());
    }

    let search = EvidenceSearch::new(DuckDuckGo::new(&config.search)?, &config.search);
    let scorer = KeywordHeuristic;

    let pb = ProgressBar::new(scales.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta})")?
            .progress_chars("=> "),
    );

    let mut records = Vec::with_capacity(scales.len());
    for (idx, scale) in scales.iter().enumerate() {
        pb.set_message(scale.display_name.clone());
        let hits = search.search(&scale.name);
        let verdict = scorer.classify(&scale.name, &scale.display_name, &hits);
        pb.println(format!(
            "{} {:<28} {:<6} {:.2}  {}",
            verdict.recommendation.icon(),
            scale.display_name,
            verdict.recommendation,
            verdict.quality_score,
            verdict.reason
        ));
        records.push(verdict.into_record(scale));
        pb.inc(1);
        if idx + 1 < scales.len() {
            std::thread::sleep(config.search.scale_delay());
        }
    }
    pb.finish_with_message("done");

    let store = ValidationStore::from_records(records);
    store.save(&args.output)?;
    write_report(&args.report, &store, &ReportOptions::default())?;

    let summary = store.summary;
    println!();
    println!("{}", rule('='));
    println!("VALIDATION SUMMARY");
    println!("{}", rule('='));
    println!("✅ KEEP:   {:3} scales - well documented", summary.keep);
    println!("⚠️  REVIEW: {:3} scales - limited documentation", summary.review);
    println!("❌ REMOVE: {:3} scales - no evidence", summary.remove);
    println!("Total:     {:3}", summary.total);
    println!();
    println!("Results: {}", args.output.display());
    println!("Report:  {}", args.report.display());
    Ok(())
}

/// Random subset of `n` scales, kept in source order.
fn sample_scales(scales: Vec<ScaleDefinition>, n: usize, seed: Option<u64>) -> Vec<ScaleDefinition> {
    if n >= scales.len() {
        return scales;
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut picked = rand::seq::index::sample(&mut rng, scales.len(), n).into_vec();
    picked.sort_unstable();
    let mut slots: Vec<Option<ScaleDefinition>> = scales.into_iter().map(Some).collect();
    picked.into_iter().filter_map(|i| slots[i].take()).collect()
}
