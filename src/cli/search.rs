//! Search command implementation

use anyhow::Result;
use clap::Args;
use console::style;

use super::utils::rule;
use crate::classify::{KeywordHeuristic, ScoringStrategy};
use crate::domain::Config;
use crate::search::{DuckDuckGo, EvidenceSearch};
use crate::utils::{display_name, truncate_chars};

#[derive(Args)]
pub struct SearchArgs {
    /// Scale name, e.g. `locrian_nat2`
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Results requested per query
    #[arg(long, value_name = "N")]
    pub max_results: Option<usize>,
}

pub fn run(args: SearchArgs, config: &Config) -> Result<()> {
    let mut search_config = config.search.clone();
    if let Some(n) = args.max_results {
        search_config.max_results = n;
    }
    let search = EvidenceSearch::new(DuckDuckGo::new(&search_config)?, &search_config);
    let display = display_name(&args.name);

    println!("Searching for: {}", style(&display).bold());
    let hits = search.search(&args.name);
    println!("{}", rule('-'));

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        let content = format!("{} {}", hit.title, hit.snippet).to_lowercase();
        let relevant = KeywordHeuristic::music_count(&content) >= 2;
        let marker = if relevant { style("✓").green() } else { style("·").dim() };
        println!("{} {}. {}", marker, i + 1, hit.title);
        println!("     {}", style(&hit.url).cyan());
        if !hit.snippet.is_empty() {
            println!("     {}", truncate_chars(&hit.snippet, 150));
        }
    }

    let verdict = KeywordHeuristic.classify(&args.name, &display, &hits);
    println!("{}", rule('-'));
    println!(
        "{} {} ({:.2}): {}",
        verdict.recommendation.icon(),
        verdict.recommendation,
        verdict.quality_score,
        verdict.reason
    );
    Ok(())
}
