//! Markdown validation report.

use anyhow::Result;
use chrono::Local;
use std::path::Path;

use crate::domain::{Recommendation, ScaleRecord};
use crate::store::ValidationStore;
use crate::utils::write_atomic;

pub struct ReportOptions {
    pub include_timestamp: bool,
    /// Per-scale detail sections for REVIEW scales.
    pub include_details: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { include_timestamp: true, include_details: true }
    }
}

pub fn render_report(store: &ValidationStore, options: &ReportOptions) -> String {
    let summary = &store.summary;
    let mut out = String::new();
    out.push_str("# Scale Validation Report\n\n");
    if options.include_timestamp {
        out.push_str(&format!("Generated: {}\n\n", Local::now().format("%Y-%m-%d %H:%M:%S")));
    }

    out.push_str("## Summary\n\n");
    out.push_str("| Status | Count | Description |\n");
    out.push_str("|--------|-------|-------------|\n");
    out.push_str(&format!(
        "| ✅ KEEP | {} | Well documented scales with multiple sources |\n",
        summary.keep
    ));
    out.push_str(&format!(
        "| ⚠️ REVIEW | {} | Limited documentation, needs manual review |\n",
        summary.review
    ));
    out.push_str(&format!("| ❌ REMOVE | {} | No evidence as musical scale |\n", summary.remove));
    out.push_str(&format!("| **Total** | **{}** | |\n", summary.total));

    let mut keep: Vec<&ScaleRecord> = store.with_recommendation(Recommendation::Keep).collect();
    keep.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));
    if !keep.is_empty() {
        out.push_str(&format!("\n---\n\n## ✅ Verified Scales ({})\n\n", keep.len()));
        out.push_str("| Scale | Quality | Sources | Best Reference |\n");
        out.push_str("|-------|---------|---------|----------------|\n");
        for scale in keep {
            let best = scale
                .sources
                .first()
                .map(|s| format!("[{}]({})", escape_cell(&s.url), s.url))
                .unwrap_or_else(|| "No URL".to_string());
            out.push_str(&format!(
                "| {} | {:.2} | {} | {} |\n",
                escape_cell(scale.label()),
                scale.quality_score,
                scale.sources.len(),
                best
            ));
        }
    }

    let review: Vec<&ScaleRecord> = store.with_recommendation(Recommendation::Review).collect();
    if !review.is_empty() {
        out.push_str(&format!("\n---\n\n## ⚠️ Scales Needing Review ({})\n\n", review.len()));
        out.push_str("| Scale | Quality | Reason |\n");
        out.push_str("|-------|---------|--------|\n");
        for scale in &review {
            out.push_str(&format!(
                "| {} | {:.2} | {} |\n",
                escape_cell(scale.label()),
                scale.quality_score,
                escape_cell(&scale.reason)
            ));
        }
    }

    let remove: Vec<&ScaleRecord> = store.with_recommendation(Recommendation::Remove).collect();
    if !remove.is_empty() {
        out.push_str(&format!("\n---\n\n## ❌ Scales to Remove ({})\n\n", remove.len()));
        out.push_str("These scales have no evidence of being documented musical scales.\n\n");
        out.push_str("| Scale | Reason |\n|-------|--------|\n");
        for scale in remove {
            out.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(scale.label()),
                escape_cell(&scale.reason)
            ));
        }
    }

    if options.include_details && review.iter().any(|s| !s.sources.is_empty()) {
        out.push_str("\n---\n\n## Review Details\n");
        for scale in review.iter().filter(|s| !s.sources.is_empty()) {
            out.push_str(&format!("\n### {} (`{}`)\n\n", scale.label(), scale.scale_name));
            out.push_str(&format!("Intervals: {:?}\n\n", scale.intervals));
            for source in &scale.sources {
                out.push_str(&format!("- [{}]({}) (quality {:.2})\n", source.title, source.url, source.quality));
                if !source.snippet.is_empty() {
                    out.push_str(&format!("  > {}\n", source.snippet));
                }
            }
        }
    }
    out
}

pub fn write_report(path: &Path, store: &ValidationStore, options: &ReportOptions) -> Result<()> {
    write_atomic(path, &render_report(store, options))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
