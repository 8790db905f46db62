//! Shared CLI utilities.

use std::path::{Path, PathBuf};

use crate::domain::Config;

pub const RULE_WIDTH: usize = 60;

pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// `--progress` if given, else the configured progress file.
pub fn progress_path(explicit: Option<&Path>, config: &Config) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(|| config.progress_file.clone())
}

/// Format an interval list the way the engine writes it: `[0, 2, 4]`.
pub fn format_intervals(intervals: &[u32]) -> String {
    let parts: Vec<String> = intervals.iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
