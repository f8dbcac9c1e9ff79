//! DuckDuckGo Instant Answer provider
//!
//! Fallback backend. Web search only, built from the Instant Answer API's
//! related topics; it has no image capability, no knowledge panel and no
//! related questions.

use super::traits::*;
use crate::config::DuckDuckGoSettings;
use crate::query::CanonicalQuery;
use crate::results::normalize::{
    assign_positions, display_host, favicon_url, first_present,
};
use crate::results::{AnswerBox, WebResult, WebResults};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    heading: Option<String>,
    abstract_text: Option<String>,
    #[serde(rename = "AbstractURL")]
    abstract_url: Option<String>,
    related_topics: Option<Vec<Topic>>,
}

/// Either a leaf topic or a named group of topics
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Topic {
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    text: Option<String>,
    topics: Option<Vec<Topic>>,
}

/// DuckDuckGo Instant Answer API provider
pub struct DuckDuckGo {
    api_url: String,
    limits: ProviderLimits,
}

impl DuckDuckGo {
    pub fn new(settings: &DuckDuckGoSettings) -> Self {
        Self {
            api_url: settings.base_url.clone(),
            limits: ProviderLimits::default(),
        }
    }

    /// Override paging bounds
    pub fn with_limits(mut self, limits: ProviderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Flatten grouped topics, keeping entries with both a URL and text
    fn flatten_topics(topics: Vec<Topic>) -> Vec<(String, String)> {
        topics
            .into_iter()
            .flat_map(|topic| match topic.topics {
                Some(children) => children,
                None => vec![topic],
            })
            .filter_map(|topic| {
                let url = first_present([topic.first_url.as_deref()])?;
                let text = first_present([topic.text.as_deref()])?;
                Some((url, text))
            })
            .collect()
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new(&DuckDuckGoSettings::default())
    }
}

impl Provider for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn limits(&self) -> &ProviderLimits {
        &self.limits
    }

    /// The API has no paging or locale parameters; only the text is sent.
    fn web_request(&self, query: &CanonicalQuery) -> Result<EngineRequest, ProviderError> {
        Ok(EngineRequest::get(&self.api_url)
            .param("q", query.text.clone())
            .param("format", "json")
            .param("no_redirect", "1")
            .param("no_html", "1"))
    }

    /// The API returns every topic at once, so pages are cut locally.
    fn web_response(
        &self,
        query: &CanonicalQuery,
        response: EngineResponse,
    ) -> Result<WebResults, ProviderError> {
        response.ensure_success(self.name())?;
        let payload: InstantAnswer = response.json()?;

        let topics = Self::flatten_topics(payload.related_topics.unwrap_or_default());
        let ranked = topics
            .into_iter()
            .map(|(link, text)| {
                let result = WebResult {
                    title: text.clone(),
                    snippet: text,
                    display_host: display_host(&link),
                    favicon_url: favicon_url(&link),
                    position: 0,
                    published_date: None,
                    site_links: None,
                    link,
                };
                (None, result)
            })
            .collect();

        let answer_box = first_present([payload.abstract_text.as_deref()]).map(|snippet| {
            AnswerBox {
                title: payload.heading.clone().unwrap_or_default(),
                snippet,
                link: first_present([payload.abstract_url.as_deref()]),
            }
        });

        let all = WebResults {
            results: assign_positions(ranked, |r, pos| r.position = pos),
            answer_box,
            knowledge_panel: None,
            related_questions: None,
        };
        Ok(window(all, query))
    }
}

/// Slice one page out of a provider that returns everything at once.
/// Positions are renumbered so they stay page-local.
fn window(mut results: WebResults, query: &CanonicalQuery) -> WebResults {
    let size = query.page_size.max(1) as usize;
    let skip = (query.page_number.max(1) as usize - 1).saturating_mul(size);

    results.results = results
        .results
        .into_iter()
        .skip(skip)
        .take(size)
        .enumerate()
        .map(|(idx, mut r)| {
            r.position = idx as u32 + 1;
            r
        })
        .collect();
    results
}
