//! Bulk promote/remove passes over the Validation Store.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use super::ValidationStore;
use crate::domain::{Recommendation, SourceRef, ValidationSummary};
use crate::utils::ensure_exists;

/// Curator-authored plan: names to drop and names to promote to KEEP.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CleanupPlan {
    pub remove: Vec<String>,
    pub promote: BTreeMap<String, Promotion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Promotion {
    pub reason: String,
    pub quality_score: f64,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// What a cleanup pass changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupOutcome {
    pub original_total: usize,
    pub removed: Vec<String>,
    pub promoted: Vec<String>,
    /// Plan entries that matched no record.
    pub unmatched: Vec<String>,
    pub summary: ValidationSummary,
}

impl CleanupPlan {
    /// Read a plan, choosing TOML, YAML or JSON by extension.
    pub fn load(path: &Path) -> Result<Self> {
        ensure_exists(path, "Cleanup plan")?;
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cleanup plan {}", path.display()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        let plan = match ext.as_str() {
            "toml" => toml::from_str(&text)
                .with_context(|| format!("Failed to parse TOML plan {}", path.display()))?,
            "yml" | "yaml" => {
                if text.trim().is_empty() {
                    Self::default()
                } else {
                    serde_yaml::from_str(&text)
                        .with_context(|| format!("Failed to parse YAML plan {}", path.display()))?
                }
            }
            "json" => serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse JSON plan {}", path.display()))?,
            other => bail!("Unsupported cleanup plan format '{}': {}", other, path.display()),
        };
        Ok(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.promote.is_empty()
    }

    /// Apply the plan in place. Removal runs first, so a name listed in both
    /// sections is removed.
    pub fn apply(&self, store: &mut ValidationStore) -> CleanupOutcome {
        let original_total = store.results.len();
        let to_remove: HashSet<&str> = self.remove.iter().map(String::as_str).collect();

        let mut removed = Vec::new();
        store.results.retain(|record| {
            if to_remove.contains(record.scale_name.as_str()) {
                tracing::debug!("Removing {}", record.scale_name);
                removed.push(record.scale_name.clone());
                false
            } else {
                true
            }
        });

        let mut promoted = Vec::new();
        for record in &mut store.results {
            let Some(promotion) = self.promote.get(&record.scale_name) else {
                continue;
            };
            record.recommendation = Recommendation::Keep;
            record.quality_score = promotion.quality_score;
            record.reason = promotion.reason.clone();
            record.sources = promotion.sources.clone();
            record.found = Some(true);
            record.scale_hits = Some(promotion.sources.len());
            promoted.push(record.scale_name.clone());
        }

        let unmatched = self
            .remove
            .iter()
            .filter(|name| !removed.contains(*name))
            .chain(self.promote.keys().filter(|name| {
                !promoted.contains(*name) && !to_remove.contains(name.as_str())
            }))
            .cloned()
            .collect::<Vec<_>>();
        for name in &unmatched {
            tracing::warn!("Cleanup plan names '{}' but no such scale is in the store", name);
        }

        store.refresh_summary();
        CleanupOutcome { original_total, removed, promoted, unmatched, summary: store.summary }
    }
}
