//! Validation Store records.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Classifier verdict for one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    Keep,
    Review,
    Remove,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "KEEP",
            Self::Review => "REVIEW",
            Self::Remove => "REMOVE",
        }
    }

    /// Case-insensitive parse. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "KEEP" => Some(Self::Keep),
            "REVIEW" => Some(Self::Review),
            "REMOVE" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Keep => "✅",
            Self::Review => "⚠️",
            Self::Remove => "❌",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Recommendation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Recommendation::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown recommendation '{raw}'")))
    }
}

/// One piece of documentary evidence for a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub quality: f64,
}

/// A reviewer's verdict on one REVIEW scale.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewDecision {
    /// Accept the scale; the first source is the one cited.
    Approve(Vec<SourceRef>),
    Reject,
    Skip,
}

impl ReviewDecision {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approve(_) => "approve",
            Self::Reject => "reject",
            Self::Skip => "skip",
        }
    }
}

/// A single entry of the Validation Store's `results` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleRecord {
    pub scale_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub intervals: Vec<u32>,
    #[serde(default)]
    pub quality_score: f64,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_hits: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_hits: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    /// Fields written by other tools; carried through rewrites untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScaleRecord {
    /// Name shown to humans, falling back to the key when the store has none.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.scale_name
        } else {
            &self.display_name
        }
    }

    pub fn is_review(&self) -> bool {
        self.recommendation == Recommendation::Review
    }
}

/// Counts by recommendation, stored alongside the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSummary {
    pub total: usize,
    pub keep: usize,
    pub review: usize,
    pub remove: usize,
}

impl ValidationSummary {
    pub fn from_records(records: &[ScaleRecord]) -> Self {
        let mut summary = Self { total: records.len(), ..Self::default() };
        for record in records {
            match record.recommendation {
                Recommendation::Keep => summary.keep += 1,
                Recommendation::Review => summary.review += 1,
                Recommendation::Remove => summary.remove += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recommendation_reads_any_case_and_writes_upper() {
        let record: ScaleRecord = serde_json::from_value(json!({
            "scale_name": "dorian",
            "recommendation": "review"
        }))
        .expect("record");
        assert_eq!(record.recommendation, Recommendation::Review);
        let back = serde_json::to_value(&record).expect("json");
        assert_eq!(back["recommendation"], json!("REVIEW"));
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let record: ScaleRecord = serde_json::from_value(json!({
            "scale_name": "dorian",
            "recommendation": "KEEP",
            "curator_note": "checked twice"
        }))
        .expect("record");
        let back = serde_json::to_value(&record).expect("json");
        assert_eq!(back["curator_note"], json!("checked twice"));
        assert!(back.get("music_hits").is_none());
    }

    #[test]
    fn summary_counts_each_bucket() {
        let make = |name: &str, rec| ScaleRecord {
            scale_name: name.to_string(),
            display_name: String::new(),
            intervals: vec![],
            quality_score: 0.0,
            recommendation: rec,
            reason: String::new(),
            sources: vec![],
            total_results: None,
            music_hits: None,
            scale_hits: None,
            found: None,
            extra: Map::new(),
        };
        let records = vec![
            make("a", Recommendation::Keep),
            make("b", Recommendation::Review),
            make("c", Recommendation::Review),
            make("d", Recommendation::Remove),
        ];
        let summary = ValidationSummary::from_records(&records);
        assert_eq!(summary, ValidationSummary { total: 4, keep: 1, review: 2, remove: 1 });
        assert_eq!(records[0].label(), "a");
    }
}
