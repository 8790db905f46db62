//! Web evidence search
//!
//! Runs the fixed query set for a scale against a [`SearchProvider`],
//! sleeping between queries and deduplicating hits by URL. Provider failures
//! are logged and skipped: a scale whose every query fails simply has no
//! evidence.

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGo;

use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::domain::SearchConfig;
use crate::utils::display_name;

/// One search-engine result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error for query '{query}': {message}")]
    Network { query: String, message: String },

    #[error("Search provider returned HTTP {status} for query '{query}'")]
    Status { query: String, status: u16 },

    #[error("Search provider throttled query '{query}'")]
    RateLimited { query: String },
}

/// A text search backend.
pub trait SearchProvider {
    fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

impl<P: SearchProvider + ?Sized> SearchProvider for &P {
    fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        (**self).text(query, max_results)
    }
}

/// The two phrasings issued for every scale.
pub fn scale_queries(display: &str) -> [String; 2] {
    [format!("\"{display} scale\" music theory intervals"), format!("{display} musical scale notes")]
}

/// Query runner with fixed rate-limit sleeps.
pub struct EvidenceSearch<P> {
    provider: P,
    max_results: usize,
    query_delay: Duration,
    error_delay: Duration,
}

impl<P: SearchProvider> EvidenceSearch<P> {
    pub fn new(provider: P, config: &SearchConfig) -> Self {
        Self {
            provider,
            max_results: config.max_results,
            query_delay: config.query_delay(),
            error_delay: config.error_delay(),
        }
    }

    /// Override the sleeps; used by tests and offline providers.
    pub fn with_delays(mut self, query_delay: Duration, error_delay: Duration) -> Self {
        self.query_delay = query_delay;
        self.error_delay = error_delay;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Search evidence for `scale_name` (a snake_case key).
    pub fn search(&self, scale_name: &str) -> Vec<SearchHit> {
        let display = display_name(scale_name);
        self.run_queries(&scale_queries(&display))
    }

    /// Run `queries` in order and return hits deduplicated by lower-cased URL.
    pub fn run_queries(&self, queries: &[String]) -> Vec<SearchHit> {
        let mut all_hits = Vec::new();
        for query in queries {
            match self.provider.text(query, self.max_results) {
                Ok(hits) => {
                    tracing::debug!("Query '{}' returned {} hits", query, hits.len());
                    all_hits.extend(hits);
                    pause(self.query_delay);
                }
                Err(e) => {
                    tracing::warn!("Search error: {}", e);
                    pause(self.error_delay);
                }
            }
        }
        dedupe_by_url(all_hits)
    }
}

/// Keep the first hit per lower-cased URL; hits without a URL are dropped.
pub fn dedupe_by_url(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| {
            let key = hit.url.trim().to_lowercase();
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned provider keyed by exact query text; unknown queries fail.
    #[derive(Default)]
    pub struct CannedProvider {
        pub answers: HashMap<String, Vec<SearchHit>>,
        pub fallback: Option<Vec<SearchHit>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl CannedProvider {
        pub fn always(hits: Vec<SearchHit>) -> Self {
            Self { fallback: Some(hits), ..Self::default() }
        }
    }

    impl SearchProvider for CannedProvider {
        fn text(&self, query: &str, _max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
            self.calls.borrow_mut().push(query.to_string());
            if let Some(hits) = self.answers.get(query) {
                return Ok(hits.clone());
            }
            self.fallback.clone().ok_or_else(|| SearchError::Network {
                query: query.to_string(),
                message: "offline".to_string(),
            })
        }
    }

    pub fn hit(title: &str, url: &str, snippet: &str) -> SearchHit {
        SearchHit { title: title.to_string(), url: url.to_string(), snippet: snippet.to_string() }
    }
}
