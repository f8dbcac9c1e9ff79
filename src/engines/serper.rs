//! Serper (Google results) provider
//!
//! Primary backend: answers web and image searches through the Serper JSON
//! API and carries the answer box, knowledge graph and "people also ask"
//! blocks through to the canonical schema.

use super::traits::*;
use crate::config::SerperSettings;
use crate::query::CanonicalQuery;
use crate::results::normalize::{
    assign_positions, display_host, favicon_url, first_present, first_text,
};
use crate::results::{
    AnswerBox, ImageResult, ImageResults, KnowledgePanel, RelatedQuestion, SiteLink, WebResult,
    WebResults,
};
use serde::Deserialize;
use serde_json::{json, Value};

const API_KEY_VAR: &str = "SERPER_API_KEY";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPayload {
    organic: Option<Vec<Organic>>,
    answer_box: Option<RawAnswerBox>,
    knowledge_graph: Option<RawKnowledgeGraph>,
    people_also_ask: Option<Vec<RawQuestion>>,
}

#[derive(Debug, Default, Deserialize)]
struct Organic {
    title: Option<String>,
    name: Option<String>,
    link: Option<String>,
    url: Option<String>,
    snippet: Option<String>,
    description: Option<String>,
    position: Option<Value>,
    date: Option<String>,
    sitelinks: Option<Vec<RawSiteLink>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSiteLink {
    title: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAnswerBox {
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    answer: Option<String>,
    snippet: Option<String>,
    #[serde(alias = "extractedAnswer")]
    extracted_answer: Option<String>,
    link: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawKnowledgeGraph {
    title: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuestion {
    question: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImagesPayload {
    images: Option<Vec<RawImage>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImage {
    title: Option<String>,
    image_url: Option<String>,
    url: Option<String>,
    thumbnail_url: Option<String>,
    source: Option<String>,
    link: Option<String>,
    position: Option<Value>,
}

/// Serper search provider
pub struct Serper {
    api_key: Option<String>,
    base_url: String,
    limits: ProviderLimits,
}

impl Serper {
    pub fn new(settings: &SerperSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            limits: ProviderLimits::default(),
        }
    }

    /// Override paging bounds
    pub fn with_limits(mut self, limits: ProviderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Whether a credential is configured
    pub fn has_credentials(&self) -> bool {
        self.api_key().is_ok()
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredential {
                provider: self.name().to_string(),
                variable: API_KEY_VAR,
            })
    }

    fn endpoint(&self, path: &str) -> Result<String, ProviderError> {
        let endpoint = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        url::Url::parse(&endpoint)
            .map_err(|e| ProviderError::Request(format!("invalid endpoint {}: {}", endpoint, e)))?;
        Ok(endpoint)
    }

    fn post(&self, path: &str, body: Value) -> Result<EngineRequest, ProviderError> {
        let key = self.api_key()?;
        Ok(EngineRequest::post(self.endpoint(path)?)
            .header("X-API-KEY", key)
            .header("Content-Type", "application/json")
            .json(body))
    }

    fn normalize_organic(items: Vec<Organic>) -> Vec<WebResult> {
        let ranked = items
            .into_iter()
            .map(|it| {
                let rank = rank_of(it.position.as_ref());
                let link = first_text([it.link.as_deref(), it.url.as_deref()]);
                let site_links: Vec<SiteLink> = it
                    .sitelinks
                    .unwrap_or_default()
                    .into_iter()
                    .map(|s| SiteLink {
                        title: s.title.unwrap_or_default(),
                        link: s.link.unwrap_or_default(),
                    })
                    .collect();

                let result = WebResult {
                    title: first_text([it.title.as_deref(), it.name.as_deref()]),
                    snippet: first_text([it.snippet.as_deref(), it.description.as_deref()]),
                    display_host: display_host(&link),
                    favicon_url: favicon_url(&link),
                    position: 0,
                    published_date: first_present([it.date.as_deref()]),
                    site_links: (!site_links.is_empty()).then_some(site_links),
                    link,
                };
                (rank, result)
            })
            .collect();

        assign_positions(ranked, |r, pos| r.position = pos)
    }

    fn normalize_answer_box(raw: RawAnswerBox) -> Option<AnswerBox> {
        let title = first_text([raw.title.as_deref(), raw.kind.as_deref()]);
        let snippet = first_text([
            raw.answer.as_deref(),
            raw.snippet.as_deref(),
            raw.extracted_answer.as_deref(),
        ]);
        if title.is_empty() && snippet.is_empty() {
            return None;
        }
        Some(AnswerBox {
            title,
            snippet,
            link: first_present([raw.link.as_deref(), raw.url.as_deref()]),
        })
    }

    fn normalize_knowledge_graph(raw: RawKnowledgeGraph) -> Option<KnowledgePanel> {
        let title = first_text([raw.title.as_deref(), raw.name.as_deref()]);
        if title.is_empty() {
            return None;
        }
        Some(KnowledgePanel {
            title,
            kind: first_present([raw.kind.as_deref()]),
            description: first_present([raw.description.as_deref()]),
            url: first_present([raw.url.as_deref()]),
            image_url: first_present([raw.image_url.as_deref()]),
        })
    }

    fn normalize_questions(raw: Vec<RawQuestion>) -> Option<Vec<RelatedQuestion>> {
        let questions: Vec<RelatedQuestion> = raw
            .into_iter()
            .filter_map(|q| {
                let question = first_present([q.question.as_deref()])?;
                Some(RelatedQuestion {
                    question,
                    snippet: q.snippet.unwrap_or_default(),
                    link: q.link.unwrap_or_default(),
                })
            })
            .collect();
        (!questions.is_empty()).then_some(questions)
    }
}

/// Upstream rank if it is a positive integer
fn rank_of(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok())
}

impl Provider for Serper {
    fn name(&self) -> &str {
        "serper"
    }

    fn limits(&self) -> &ProviderLimits {
        &self.limits
    }

    fn web_request(&self, query: &CanonicalQuery) -> Result<EngineRequest, ProviderError> {
        self.post(
            "search",
            json!({
                "q": query.text,
                "hl": query.language,
                "gl": query.region,
                "num": query.page_size,
                "page": query.page_number,
                "autocorrect": true,
            }),
        )
    }

    fn web_response(
        &self,
        _query: &CanonicalQuery,
        response: EngineResponse,
    ) -> Result<WebResults, ProviderError> {
        response.ensure_success(self.name())?;
        let payload: SearchPayload = response.json()?;

        Ok(WebResults {
            results: Self::normalize_organic(payload.organic.unwrap_or_default()),
            answer_box: payload.answer_box.and_then(Self::normalize_answer_box),
            knowledge_panel: payload
                .knowledge_graph
                .and_then(Self::normalize_knowledge_graph),
            related_questions: payload
                .people_also_ask
                .and_then(Self::normalize_questions),
        })
    }

    fn images(&self) -> Option<&dyn ImageSearch> {
        Some(self)
    }
}

impl ImageSearch for Serper {
    fn image_request(&self, query: &CanonicalQuery) -> Result<EngineRequest, ProviderError> {
        self.post(
            "images",
            json!({
                "q": query.text,
                "hl": query.language,
                "gl": query.region,
                "num": query.page_size,
                "page": query.page_number,
            }),
        )
    }

    fn image_response(
        &self,
        _query: &CanonicalQuery,
        response: EngineResponse,
    ) -> Result<ImageResults, ProviderError> {
        response.ensure_success(self.name())?;
        let payload: ImagesPayload = response.json()?;

        let ranked = payload
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|it| {
                let rank = rank_of(it.position.as_ref());
                let image_url = first_text([it.image_url.as_deref(), it.url.as_deref()]);
                let image = ImageResult {
                    title: it.title.unwrap_or_default(),
                    thumbnail_url: first_text([it.thumbnail_url.as_deref(), Some(image_url.as_str())]),
                    source_label: it.source.unwrap_or_default(),
                    link: first_text([it.link.as_deref(), Some(image_url.as_str())]),
                    position: 0,
                    image_url,
                };
                (rank, image)
            })
            .collect();

        Ok(ImageResults {
            images: assign_positions(ranked, |img, pos| img.position = pos),
        })
    }
}
