//! Core data types and runtime configuration.

pub mod scale;

pub use scale::{Recommendation, ReviewDecision, ScaleRecord, SourceRef, ValidationSummary};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROGRESS_FILE: &str = "review_progress.json";
pub const DEFAULT_VALIDATION_FILE: &str = "scale_validation_results.json";
pub const DEFAULT_REPORT_FILE: &str = "SCALE_VALIDATION_REPORT.md";

/// Quality at or above which a reference is categorised as `verified`.
pub const VERIFIED_QUALITY_THRESHOLD: f64 = 0.7;

/// Tool configuration after file loading. Every field has a default so an
/// empty or missing config file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub progress_file: PathBuf,
    pub batch_size: usize,
    pub search: SearchConfig,
    pub citations: CitationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress_file: PathBuf::from(DEFAULT_PROGRESS_FILE),
            batch_size: 10,
            search: SearchConfig::default(),
            citations: CitationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_results: usize,
    pub query_delay_ms: u64,
    pub error_delay_ms: u64,
    pub scale_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            user_agent: concat!("scale-curator/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 20,
            max_results: 5,
            query_delay_ms: 2_000,
            error_delay_ms: 3_000,
            scale_delay_ms: 3_000,
        }
    }
}

impl SearchConfig {
    /// Rate-limit floors: at least 1s between queries and 2s after a failure.
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms.max(1_000))
    }

    pub fn error_delay(&self) -> Duration {
        Duration::from_millis(self.error_delay_ms.max(2_000))
    }

    pub fn scale_delay(&self) -> Duration {
        Duration::from_millis(self.scale_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationConfig {
    pub verified_threshold: f64,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self { verified_threshold: VERIFIED_QUALITY_THRESHOLD }
    }
}
