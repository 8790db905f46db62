//! Quality classification of search evidence

pub mod keywords;

pub use keywords::KeywordHeuristic;

use crate::domain::{Recommendation, ScaleRecord, SourceRef};
use crate::extract::ScaleDefinition;
use crate::search::SearchHit;

/// Outcome of classifying one scale's evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub quality_score: f64,
    pub recommendation: Recommendation,
    pub reason: String,
    /// Qualifying sources, best first, at most three.
    pub sources: Vec<SourceRef>,
    pub total_results: usize,
    pub music_hits: usize,
    pub scale_hits: usize,
}

impl Classification {
    /// Validation Store record for `scale` carrying this verdict.
    pub fn into_record(self, scale: &ScaleDefinition) -> ScaleRecord {
        ScaleRecord {
            scale_name: scale.name.clone(),
            display_name: scale.display_name.clone(),
            intervals: scale.intervals.clone(),
            quality_score: self.quality_score,
            recommendation: self.recommendation,
            reason: self.reason,
            sources: self.sources,
            total_results: Some(self.total_results),
            music_hits: Some(self.music_hits),
            scale_hits: Some(self.scale_hits),
            found: Some(self.scale_hits > 0),
            extra: Default::default(),
        }
    }
}

/// Turns raw hits into a verdict.
pub trait ScoringStrategy {
    fn classify(&self, scale_name: &str, display_name: &str, hits: &[SearchHit]) -> Classification;
}
