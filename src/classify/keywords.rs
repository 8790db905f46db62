//! Keyword-count heuristic

use super::{Classification, ScoringStrategy};
use crate::domain::{Recommendation, SourceRef};
use crate::search::SearchHit;
use crate::utils::truncate_chars;

const MUSIC_KEYWORDS: &[&str] = &[
    "scale",
    "mode",
    "interval",
    "note",
    "degree",
    "semitone",
    "music theory",
    "chord",
    "harmony",
    "melody",
    "key",
    "pitch",
    "octave",
    "tonic",
    "dominant",
];

/// A hit needs this many distinct keywords to count as scale documentation.
const MIN_KEYWORDS: usize = 2;
const MAX_SOURCES: usize = 3;
const TITLE_CHARS: usize = 80;
const SNIPPET_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordHeuristic;

impl KeywordHeuristic {
    pub fn music_count(content: &str) -> usize {
        MUSIC_KEYWORDS.iter().filter(|kw| content.contains(*kw)).count()
    }

    /// Quality tier of a qualifying hit.
    pub fn source_quality(url: &str, content: &str, scale_name: &str, display_name: &str) -> f64 {
        let url = url.to_lowercase();
        if url.contains(".edu") || url.contains("wikipedia") {
            return 0.9;
        }
        if url.contains("musictheory") || url.contains("jazz") {
            return 0.7;
        }
        let has_scale_word = content.contains("scale") || content.contains("mode");
        let spaced = scale_name.to_lowercase().replace('_', " ");
        let has_name = content.contains(&spaced) || content.contains(&display_name.to_lowercase());
        if has_scale_word && has_name {
            0.6
        } else {
            0.5
        }
    }
}

impl ScoringStrategy for KeywordHeuristic {
    fn classify(&self, scale_name: &str, display_name: &str, hits: &[SearchHit]) -> Classification {
        let mut music_hits = 0;
        let mut sources = Vec::new();

        for hit in hits {
            let content = format!("{} {}", hit.title, hit.snippet).to_lowercase();
            let count = Self::music_count(&content);
            if count >= 1 {
                music_hits += 1;
            }
            if count < MIN_KEYWORDS {
                continue;
            }
            sources.push(SourceRef {
                title: truncate_chars(&hit.title, TITLE_CHARS),
                url: hit.url.clone(),
                snippet: truncate_chars(&hit.snippet, SNIPPET_CHARS),
                quality: Self::source_quality(&hit.url, &content, scale_name, display_name),
            });
        }

        let scale_hits = sources.len();
        // `sort_by` is stable, so equal tiers keep search order.
        sources.sort_by(|a, b| b.quality.total_cmp(&a.quality));
        sources.truncate(MAX_SOURCES);

        let (quality_score, recommendation, reason) = if scale_hits >= 2 {
            (
                (0.4 + 0.15 * scale_hits as f64).min(0.9),
                Recommendation::Keep,
                format!("Found {} sources with scale documentation", scale_hits),
            )
        } else if scale_hits == 1 {
            (0.45, Recommendation::Review, "Only one source with scale info".to_string())
        } else if hits.is_empty() {
            (0.0, Recommendation::Remove, "No search results found".to_string())
        } else if music_hits > 0 {
            (
                0.3,
                Recommendation::Review,
                "Music content found but no specific scale docs".to_string(),
            )
        } else {
            (0.0, Recommendation::Remove, "No music theory content found".to_string())
        };

        tracing::debug!(
            "{}: {} hits, {} music, {} scale -> {} ({:.2})",
            scale_name,
            hits.len(),
            music_hits,
            scale_hits,
            recommendation,
            quality_score
        );

        Classification {
            quality_score,
            recommendation,
            reason,
            sources,
            total_results: hits.len(),
            music_hits,
            scale_hits,
        }
    }
}
