//! Review command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use std::path::PathBuf;

use super::utils::{format_intervals, progress_path, rule};
use crate::citations::{CitationFile, CitationMerger};
use crate::classify::KeywordHeuristic;
use crate::domain::{Config, ScaleRecord, SourceRef};
use crate::review::{Choice, Prompter, ReviewSession, SessionStats};
use crate::search::{DuckDuckGo, EvidenceSearch};
use crate::store::{ReviewTracker, ValidationStore};
use crate::utils::ensure_exists;

#[derive(Args)]
pub struct ReviewArgs {
    /// Validation results written by `validate`
    #[arg(value_name = "VALIDATION_JSON")]
    pub validation_json: PathBuf,

    /// JavaScript engine file containing `scaleCitations = { ... }`
    #[arg(value_name = "JS_FILE")]
    pub js_file: PathBuf,

    /// Scales per batch
    #[arg(short, long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Review progress file
    #[arg(long, value_name = "FILE")]
    pub progress: Option<PathBuf>,
}

pub fn run(args: ReviewArgs, config: &Config) -> Result<()> {
    ensure_exists(&args.validation_json, "Validation JSON file")?;
    ensure_exists(&args.js_file, "JavaScript file")?;

    let store = ValidationStore::load(&args.validation_json)?;
    let progress_file = progress_path(args.progress.as_deref(), config);
    let mut tracker = ReviewTracker::open(&progress_file, &store)?;
    let mut citations = CitationFile::open(&args.js_file)?;

    let search = EvidenceSearch::new(DuckDuckGo::new(&config.search)?, &config.search);
    let scorer = KeywordHeuristic;
    let merger = CitationMerger::new(config.citations.verified_threshold);
    let batch_size = args.batch_size.unwrap_or(config.batch_size).max(1);
    let session = ReviewSession::new(&search, &scorer, merger, batch_size);

    println!("🎵 Starting Batch Review Session");
    println!("{}", rule('='));
    let pending = tracker.remaining();
    if pending == 0 {
        println!("✅ No more scales to review! All REVIEW-status scales have been processed.");
        return Ok(());
    }
    println!("📋 {} scales in this batch", pending.min(batch_size));
    println!("📊 Total remaining scales: {}", pending);
    println!(
        "📅 Last updated: {}",
        tracker.progress().last_updated.as_deref().unwrap_or("Never")
    );

    let mut prompter = TerminalPrompter::default();
    let stats = session.run(&mut tracker, &mut citations, &mut prompter)?;
    print_summary(&stats, &tracker, &progress_file);
    Ok(())
}

fn print_summary(stats: &SessionStats, tracker: &ReviewTracker, progress_file: &std::path::Path) {
    println!();
    println!("{}", rule('='));
    println!("📊 BATCH REVIEW SESSION SUMMARY");
    println!("{}", rule('='));
    println!("✅ Scales approved: {}", stats.approved);
    println!("❌ Scales rejected: {}", stats.rejected);
    println!("⏭️  Scales skipped: {}", stats.skipped);
    println!("📝 Total processed: {}", stats.processed);
    println!("📋 Remaining scales: {}", stats.remaining);

    if stats.complete {
        println!();
        println!("🎉 ALL REVIEW SCALES COMPLETED!");
        println!("🏆 Total reviewed scales: {}", tracker.progress().reviewed_scales.len());
    } else if stats.cancelled {
        println!();
        println!("⏸️  Session paused by user");
        println!("🔄 Run again to continue with remaining {} scales", stats.remaining);
    } else {
        println!();
        println!("📅 Batch complete - {} scales remaining", stats.remaining);
        println!("🔄 Run again to process the next batch");
    }
    println!("💾 Progress saved to: {}", progress_file.display());
    println!("{}", rule('='));
}

/// Prompts on the controlling terminal. An interrupted prompt counts as quit.
#[derive(Default)]
struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn announce(&mut self, position: usize, batch_len: usize, record: &ScaleRecord) {
        println!();
        println!("🔍 Processing scale {}/{}: {}", position, batch_len, record.scale_name);
        println!("   Searching for sources...");
    }

    fn decide(&mut self, record: &ScaleRecord, sources: &[SourceRef]) -> Result<Choice> {
        println!();
        println!("{}", rule('='));
        println!("🎵 REVIEWING: {} ({})", style(record.label()).bold(), record.scale_name);
        println!("{}", rule('='));
        println!("Intervals: {}", format_intervals(&record.intervals));
        println!("Current Quality Score: {:.2}", record.quality_score);
        println!("Current Status: {}", record.reason);

        let mut items = Vec::new();
        let mut choices = Vec::new();
        if sources.is_empty() {
            println!();
            println!("❌ No sources found for this scale.");
        } else {
            println!();
            println!("📚 Found {} potential sources:", sources.len());
            println!("{}", rule('-'));
            for (i, source) in sources.iter().enumerate() {
                println!();
                println!("{}. {}", i + 1, source.title);
                println!("   URL: {}", style(&source.url).cyan());
                println!("   Quality: {:.2}", source.quality);
                println!("   Preview: {}...", source.snippet);
            }
            println!();
            println!("{}", rule('-'));
            items.push("Approve - add best source and mark as 'manually-verified'");
            choices.push(Choice::Approve);
        }
        items.push("Reject - mark as 'limited-documentation'");
        choices.push(Choice::Reject);
        items.push("Skip - leave for later review");
        choices.push(Choice::Skip);
        items.push("Quit - save progress and stop");
        choices.push(Choice::Quit);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Your choice")
            .default(0)
            .items(&items)
            .interact_opt();
        match interrupted_as_none(selection)? {
            Some(idx) => Ok(choices.get(idx).copied().unwrap_or(Choice::Skip)),
            None => Ok(Choice::Quit),
        }
    }

    fn continue_batch(&mut self, done: usize, batch_len: usize) -> Result<bool> {
        println!();
        println!("📊 Progress: {}/{} scales processed in this batch", done, batch_len);
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Continue with next scale?")
            .default(true)
            .interact_opt();
        Ok(interrupted_as_none(answer)?.unwrap_or(false))
    }
}

/// Ctrl+C and Esc both end the prompt without a value.
fn interrupted_as_none<T>(result: dialoguer::Result<Option<T>>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
            println!();
            println!("⚠️  Batch review interrupted by user (Ctrl+C)");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
