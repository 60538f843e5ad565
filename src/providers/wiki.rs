//! Wikipedia summaries via the MediaWiki action API.
//!
//! Three steps, mirroring what a reader does by hand:
//! 1. **Search** the topic and take the best title (auto-suggest).
//! 2. **Extract** the plain-text intro of that page, following redirects.
//! 3. If the page is a disambiguation page, list up to five linked titles.

use serde::Deserialize;

use super::{EncyclopediaProvider, ProviderResult, error_body, http_agent};
use crate::error::ProviderError;

const PROVIDER: &str = "wikipedia";

/// Maximum number of candidates listed for an ambiguous topic.
pub const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PagesResponse {
    query: PagesQuery,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<PageLink>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    title: String,
}

/// Client for `{base}/w/api.php`.
pub struct WikipediaClient {
    agent: ureq::Agent,
    api_url: String,
    sentences: usize,
}

impl WikipediaClient {
    pub fn new(base_url: impl Into<String>, sentences: usize, timeout_secs: u64) -> Self {
        let base: String = base_url.into();
        Self {
            agent: http_agent(timeout_secs),
            api_url: format!("{}/w/api.php", base.trim_end_matches('/')),
            sentences: sentences.max(1),
        }
    }

    fn get<T: serde::de::DeserializeOwned>(&self, params: &[(&str, &str)]) -> ProviderResult<T> {
        let mut request = self
            .agent
            .get(&self.api_url)
            .query("format", "json")
            .query("formatversion", "2");
        for (k, v) in params {
            request = request.query(k, v);
        }
        match request.call() {
            Ok(resp) => resp
                .into_json::<T>()
                .map_err(|e| ProviderError::unavailable(PROVIDER, e)),
            Err(ureq::Error::Status(code, resp)) => {
                let body = error_body(resp);
                tracing::warn!(code, body = %body, "wikipedia request rejected");
                Err(ProviderError::unavailable(PROVIDER, format!("HTTP {code}")))
            }
            Err(ureq::Error::Transport(t)) => {
                tracing::warn!(error = %t, "wikipedia transport error");
                Err(ProviderError::unavailable(PROVIDER, t))
            }
        }
    }

    fn best_title(&self, topic: &str) -> ProviderResult<String> {
        let resp: SearchResponse = self.get(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", topic),
            ("srlimit", "1"),
        ])?;
        resp.query
            .search
            .into_iter()
            .next()
            .map(|hit| hit.title)
            .ok_or_else(|| ProviderError::NotFound {
                provider: PROVIDER.into(),
                subject: topic.into(),
            })
    }

    fn candidates(&self, title: &str) -> ProviderResult<Vec<String>> {
        let limit = MAX_CANDIDATES.to_string();
        let resp: PagesResponse = self.get(&[
            ("action", "query"),
            ("prop", "links"),
            ("titles", title),
            ("plnamespace", "0"),
            ("pllimit", limit.as_str()),
        ])?;
        Ok(resp
            .query
            .pages
            .into_iter()
            .flat_map(|p| p.links)
            .map(|l| l.title)
            .take(MAX_CANDIDATES)
            .collect())
    }
}

impl EncyclopediaProvider for WikipediaClient {
    fn summary(&self, topic: &str) -> ProviderResult<String> {
        let title = self.best_title(topic)?;

        let resp: PagesResponse = self.get(&[
            ("action", "query"),
            ("prop", "extracts|pageprops"),
            ("ppprop", "disambiguation"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("titles", title.as_str()),
        ])?;

        let not_found = || ProviderError::NotFound {
            provider: PROVIDER.into(),
            subject: topic.into(),
        };
        let page = resp.query.pages.into_iter().next().ok_or_else(not_found)?;
        if page.missing {
            return Err(not_found());
        }

        let is_disambiguation = page
            .pageprops
            .as_ref()
            .is_some_and(|p| p.disambiguation.is_some());
        if is_disambiguation {
            let candidates = self.candidates(&page.title)?;
            return Err(ProviderError::Ambiguous {
                subject: topic.into(),
                candidates,
            });
        }

        let extract = page.extract.unwrap_or_default();
        let summary = first_sentences(&extract, self.sentences);
        if summary.is_empty() {
            return Err(not_found());
        }
        Ok(summary)
    }
}

/// Keep the first `n` sentences of `text`.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or end of text.
pub fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    let mut count = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                count += 1;
                if count == n {
                    return text[..i + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}
