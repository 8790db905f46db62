//! Validation Store: the JSON output of a validation run.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::domain::{Recommendation, ScaleRecord, ValidationSummary};
use crate::error::CurateError;
use crate::utils::{ensure_exists, write_atomic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub summary: ValidationSummary,
    pub results: Vec<ScaleRecord>,
    /// Top-level keys such as `validation_date` written by other tools.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationStore {
    /// Fresh store for a validation run, stamped with the current time.
    pub fn from_records(results: Vec<ScaleRecord>) -> Self {
        Self {
            timestamp: Some(Local::now().to_rfc3339()),
            summary: ValidationSummary::from_records(&results),
            results,
            extra: Map::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        ensure_exists(path, "Validation JSON file")?;
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let store = Self::parse(&text, &path.display().to_string())?;
        tracing::debug!("Loaded {} records from {}", store.results.len(), path.display());
        Ok(store)
    }

    pub fn parse(text: &str, context: &str) -> std::result::Result<Self, CurateError> {
        serde_json::from_str(text).map_err(|e| CurateError::Parse {
            context: context.to_string(),
            offset: byte_offset(text, e.line(), e.column()),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize validation store")?;
        write_atomic(path, &format!("{}\n", json))
    }

    /// Recompute `summary` from `results`.
    pub fn refresh_summary(&mut self) {
        self.summary = ValidationSummary::from_records(&self.results);
    }

    pub fn get(&self, scale_name: &str) -> Option<&ScaleRecord> {
        self.results.iter().find(|r| r.scale_name == scale_name)
    }

    pub fn with_recommendation(&self, rec: Recommendation) -> impl Iterator<Item = &ScaleRecord> {
        self.results.iter().filter(move |r| r.recommendation == rec)
    }

    /// REVIEW scale names in store order.
    pub fn review_names(&self) -> Vec<String> {
        self.with_recommendation(Recommendation::Review).map(|r| r.scale_name.clone()).collect()
    }

    pub fn keep_names(&self) -> Vec<String> {
        self.with_recommendation(Recommendation::Keep).map(|r| r.scale_name.clone()).collect()
    }
}

fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text.split_inclusive('\n').take(line - 1).map(str::len).sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}
