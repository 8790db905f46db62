//! Review Progress Tracker
//!
//! Remembers which REVIEW scales have been decided so a session can resume.
//! `reviewedScales` only ever grows; `remainingScales` is recomputed from the
//! Validation Store on every save.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use super::ValidationStore;
use crate::domain::{ReviewDecision, ScaleRecord, SourceRef};
use crate::utils::write_atomic;

/// On-disk shape of the progress file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewProgress {
    pub last_updated: Option<String>,
    pub total_review_scales: usize,
    pub reviewed_scales: Vec<String>,
    pub remaining_scales: Vec<String>,
    pub approved_sources: BTreeMap<String, Vec<SourceRef>>,
    pub rejected_scales: Vec<String>,
}

pub struct ReviewTracker {
    progress: ReviewProgress,
    review: Vec<ScaleRecord>,
    path: Option<PathBuf>,
}

impl ReviewTracker {
    /// Tracker that never touches the filesystem.
    pub fn in_memory(store: &ValidationStore) -> Self {
        let mut tracker = Self {
            progress: ReviewProgress::default(),
            review: review_records(store),
            path: None,
        };
        tracker.refresh();
        tracker
    }

    /// Load the progress file at `path`, creating it when absent. A corrupt
    /// file is replaced with an empty record.
    pub fn open(path: &Path, store: &ValidationStore) -> Result<Self> {
        let progress = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read progress file {}", path.display()))?;
            match serde_json::from_str::<ReviewProgress>(&text) {
                Ok(progress) => progress,
                Err(e) => {
                    tracing::warn!(
                        "Progress file {} is corrupt ({}); starting with empty progress",
                        path.display(),
                        e
                    );
                    ReviewProgress::default()
                }
            }
        } else {
            tracing::debug!("No progress file at {}; creating one", path.display());
            ReviewProgress::default()
        };

        let mut tracker =
            Self { progress, review: review_records(store), path: Some(path.to_path_buf()) };
        tracker.save()?;
        Ok(tracker)
    }

    pub fn progress(&self) -> &ReviewProgress {
        &self.progress
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_reviewed(&self, scale_name: &str) -> bool {
        self.progress.reviewed_scales.iter().any(|s| s == scale_name)
    }

    pub fn remaining(&self) -> usize {
        self.review.iter().filter(|r| !self.is_reviewed(&r.scale_name)).count()
    }

    pub fn total(&self) -> usize {
        self.review.len()
    }

    /// Up to `n` undecided REVIEW records in store order.
    pub fn get_next_batch(&self, n: usize) -> Vec<ScaleRecord> {
        self.review
            .iter()
            .filter(|r| !self.is_reviewed(&r.scale_name))
            .take(n)
            .cloned()
            .collect()
    }

    /// Record a decision and persist. Skip leaves no trace.
    pub fn record_decision(&mut self, scale_name: &str, decision: &ReviewDecision) -> Result<()> {
        match decision {
            ReviewDecision::Skip => return Ok(()),
            ReviewDecision::Approve(sources) => {
                self.mark_reviewed(scale_name);
                if let Some(best) = sources.first() {
                    self.progress
                        .approved_sources
                        .entry(scale_name.to_string())
                        .or_insert_with(|| vec![best.clone()]);
                }
            }
            ReviewDecision::Reject => {
                self.mark_reviewed(scale_name);
                if !self.progress.rejected_scales.iter().any(|s| s == scale_name) {
                    self.progress.rejected_scales.push(scale_name.to_string());
                }
            }
        }
        self.save()
    }

    /// A cleanup pass promoted the scale out of REVIEW.
    pub fn record_promotion(&mut self, scale_name: &str) -> Result<()> {
        self.mark_reviewed(scale_name);
        self.save()
    }

    /// Refresh derived fields and write the file, if any.
    pub fn save(&mut self) -> Result<()> {
        self.refresh();
        self.progress.last_updated = Some(Local::now().to_rfc3339());
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.progress)
            .context("Failed to serialize review progress")?;
        write_atomic(path, &format!("{}\n", json))
            .with_context(|| format!("Cannot save progress file {}", path.display()))
    }

    fn mark_reviewed(&mut self, scale_name: &str) {
        if !self.is_reviewed(scale_name) {
            self.progress.reviewed_scales.push(scale_name.to_string());
        }
    }

    fn refresh(&mut self) {
        self.progress.total_review_scales = self.review.len();
        self.progress.remaining_scales = self
            .review
            .iter()
            .filter(|r| !self.is_reviewed(&r.scale_name))
            .map(|r| r.scale_name.clone())
            .collect();
    }
}

/// REVIEW records in store order; a repeated `scale_name` keeps its first record.
fn review_records(store: &ValidationStore) -> Vec<ScaleRecord> {
    let mut seen = HashSet::new();
    store
        .results
        .iter()
        .filter(|r| r.is_review())
        .filter(|r| {
            let fresh = seen.insert(r.scale_name.as_str());
            if !fresh {
                tracing::warn!("Duplicate REVIEW record for {}; keeping the first", r.scale_name);
            }
            fresh
        })
        .cloned()
        .collect()
}
