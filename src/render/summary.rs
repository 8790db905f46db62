//! Plain-text summaries printed after imports.

use crate::citations::ImportOutcome;
use crate::domain::Recommendation;
use crate::store::ValidationStore;

const RULE_WIDTH: usize = 60;

/// `verified_threshold` is the quality at which a reference counts as high quality.
pub fn render_import_summary(store: &ValidationStore, outcome: &ImportOutcome, verified_threshold: f64) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let keep: Vec<_> = store.with_recommendation(Recommendation::Keep).collect();
    let review_count = store.with_recommendation(Recommendation::Review).count();
    let remove_count = store.with_recommendation(Recommendation::Remove).count();

    let keep_refs: usize = keep.iter().map(|r| r.sources.len()).sum();
    let high_quality: usize = keep
        .iter()
        .flat_map(|r| r.sources.iter())
        .filter(|s| s.quality >= verified_threshold)
        .count();
    let per_scale = if keep.is_empty() { 0.0 } else { keep_refs as f64 / keep.len() as f64 };
    let validation_date = store
        .extra
        .get("validation_date")
        .and_then(|v| v.as_str())
        .or(store.timestamp.as_deref())
        .unwrap_or("Unknown");

    let lines = [
        rule.clone(),
        "SCALE CITATION INTEGRATION SUMMARY".to_string(),
        rule.clone(),
        format!("Validation Date: {}", validation_date),
        format!("Total Scales Processed: {}", store.results.len()),
        String::new(),
        "SCALE CATEGORIZATION:".to_string(),
        format!("  • KEEP (well-documented): {} scales", keep.len()),
        format!("  • REVIEW (limited docs): {} scales", review_count),
        format!("  • REMOVE (insufficient): {} scales", remove_count),
        String::new(),
        "REFERENCE STATISTICS:".to_string(),
        format!("  • Total references imported: {}", outcome.references),
        format!("  • High-quality references (≥{}): {}", verified_threshold, high_quality),
        format!("  • Average references per KEEP scale: {:.1}", per_scale),
        String::new(),
        "CITATION UPDATES:".to_string(),
        format!("  • {} citation entries updated ({} new)", outcome.updated, outcome.created),
        format!("  • {} scales set to 'verified' status", outcome.verified),
        format!("  • {} scales set to 'needs-review' status", outcome.needs_review),
        String::new(),
        "NEXT STEPS:".to_string(),
        format!("  • {} scales ready for UI display", outcome.verified),
        format!("  • {} scales need manual review via `scale-curator review`", outcome.needs_review),
        rule,
    ];
    lines.join("\n")
}
