//! DuckDuckGo HTML endpoint provider
//!
//! Issues a GET against the no-JavaScript results page and scrapes result
//! anchors and snippets with regexes. The endpoint answers HTTP 202 with an
//! empty page when it throttles a client.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;

use super::{SearchError, SearchHit, SearchProvider};
use crate::domain::SearchConfig;

static RESULT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="[^"]*result__a[^"]*"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("valid regex")
});
static RESULT_LINK_HREF_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*href="([^"]*)"[^>]*class="[^"]*result__a[^"]*"[^>]*>(.*?)</a>"#)
        .expect("valid regex")
});
static RESULT_SNIPPET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<(?:a|div|td)[^>]*class="[^"]*result__snippet[^"]*"[^>]*>(.*?)</(?:a|div|td)>"#)
        .expect("valid regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

pub struct DuckDuckGo {
    client: Client,
    endpoint: String,
}

impl DuckDuckGo {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| SearchError::Network {
                query: String::new(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, endpoint: config.endpoint.clone() })
    }

    fn request(&self, query: &str) -> RequestBuilder {
        self.client.get(&self.endpoint).query(&[("q", query)])
    }
}

impl SearchProvider for DuckDuckGo {
    fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        tracing::debug!("GET {} q={}", self.endpoint, query);

        let network = |e: reqwest::Error| SearchError::Network {
            query: query.to_string(),
            message: e.to_string(),
        };
        let response = self.request(query).send().map_err(network)?;

        let status = response.status();
        if status == StatusCode::ACCEPTED || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimited { query: query.to_string() });
        }
        if !status.is_success() {
            return Err(SearchError::Status { query: query.to_string(), status: status.as_u16() });
        }

        let body = response.text().map_err(network)?;
        Ok(parse_results(&body, max_results))
    }
}

/// Scrape up to `max_results` hits from a results page.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let mut links: Vec<(usize, String, String)> = RESULT_LINK
        .captures_iter(html)
        .chain(RESULT_LINK_HREF_FIRST.captures_iter(html))
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            Some((start, resolve_href(&caps[1]), clean_text(&caps[2])))
        })
        .collect();
    links.sort_by_key(|(start, _, _)| *start);
    links.dedup_by_key(|(start, _, _)| *start);

    let snippets: Vec<(usize, String)> = RESULT_SNIPPET
        .captures_iter(html)
        .filter_map(|caps| Some((caps.get(0)?.start(), clean_text(&caps[1]))))
        .collect();

    links
        .iter()
        .enumerate()
        .map(|(i, (start, url, title))| {
            let next_start = links.get(i + 1).map(|(s, _, _)| *s).unwrap_or(usize::MAX);
            let snippet = snippets
                .iter()
                .find(|(pos, _)| pos > start && *pos < next_start)
                .map(|(_, text)| text.clone())
                .unwrap_or_default();
            SearchHit { title: title.clone(), url: url.clone(), snippet }
        })
        .filter(|hit| !hit.url.is_empty())
        .take(max_results)
        .collect()
}

/// Unwrap DuckDuckGo's `/l/?uddg=<target>` redirect links.
fn resolve_href(raw: &str) -> String {
    let href = decode_entities(raw);
    if let Some(idx) = href.find("uddg=") {
        let encoded = href[idx + 5..].split('&').next().unwrap_or_default();
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return decoded.into_owned();
        }
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    href
}

fn clean_text(fragment: &str) -> String {
    let stripped = TAG.replace_all(fragment, "");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|&end| end <= 10) {
            Some(end) => {
                let entity = &tail[1..end];
                match decode_entity(entity) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}
