//! Canonical result type definitions
//!
//! Every provider adapter normalizes into these shapes. Optional blocks are
//! `None` when the provider supplied nothing; they are never serialized as
//! empty objects.

use crate::query::{CanonicalQuery, ResultKind};
use serde::{Deserialize, Serialize};

/// A single web search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResult {
    pub title: String,
    /// Absolute URL of the result
    pub link: String,
    pub snippet: String,
    /// Hostname of `link`, empty if unparsable
    pub display_host: String,
    /// 1-based rank within the page
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    /// Icon URL derived from the link's origin, or an inert placeholder
    pub favicon_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_links: Option<Vec<SiteLink>>,
}

/// Deep link shown under a web result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLink {
    pub title: String,
    pub link: String,
}

/// A single image search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub title: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub source_label: String,
    pub link: String,
    pub position: u32,
}

/// Direct answer block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBox {
    pub title: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Entity sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgePanel {
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// "People also ask" entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedQuestion {
    pub question: String,
    pub snippet: String,
    pub link: String,
}

/// Normalized payload of a web search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResults {
    pub results: Vec<WebResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_box: Option<AnswerBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_panel: Option<KnowledgePanel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_questions: Option<Vec<RelatedQuestion>>,
}

impl WebResults {
    pub fn with_results(results: Vec<WebResult>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }
}

/// Normalized payload of an image search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResults {
    pub images: Vec<ImageResult>,
}

/// The items a response carries: web results or images, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultSet {
    Web(WebResults),
    Images(ImageResults),
}

impl ResultSet {
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Web(_) => ResultKind::Web,
            Self::Images(_) => ResultKind::Image,
        }
    }

    /// Number of primary items (web results or images)
    pub fn len(&self) -> usize {
        match self {
            Self::Web(web) => web.results.len(),
            Self::Images(images) => images.images.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positions of the primary items, in order
    pub fn positions(&self) -> Vec<u32> {
        match self {
            Self::Web(web) => web.results.iter().map(|r| r.position).collect(),
            Self::Images(images) => images.images.iter().map(|r| r.position).collect(),
        }
    }
}

/// Aggregator output: one provider's normalized answer plus provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Identifier of the adapter that answered
    pub provider: String,
    /// The query as dispatched (after clamping)
    pub query: CanonicalQuery,
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub items: ResultSet,
}

impl SearchResponse {
    pub fn web(&self) -> Option<&WebResults> {
        match &self.items {
            ResultSet::Web(web) => Some(web),
            ResultSet::Images(_) => None,
        }
    }

    pub fn images(&self) -> Option<&ImageResults> {
        match &self.items {
            ResultSet::Images(images) => Some(images),
            ResultSet::Web(_) => None,
        }
    }

    pub fn result_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(position: u32) -> WebResult {
        WebResult {
            title: "Example".to_string(),
            link: "https://example.com".to_string(),
            snippet: String::new(),
            display_host: "example.com".to_string(),
            position,
            published_date: None,
            favicon_url: "https://icons.example/x".to_string(),
            site_links: None,
        }
    }

    #[test]
    fn test_web_response_omits_images_and_absent_blocks() {
        let response = SearchResponse {
            provider: "serper".to_string(),
            query: CanonicalQuery::new("rust"),
            elapsed_ms: 12,
            items: ResultSet::Web(WebResults::with_results(vec![sample_result(1)])),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["provider"], "serper");
        assert_eq!(json["elapsedMs"], 12);
        assert_eq!(json["results"][0]["displayHost"], "example.com");
        assert!(json.get("images").is_none());
        assert!(json.get("answerBox").is_none());
        assert!(json.get("knowledgePanel").is_none());
        assert!(json["results"][0].get("siteLinks").is_none());
    }

    #[test]
    fn test_image_response_omits_results() {
        let response = SearchResponse {
            provider: "serper".to_string(),
            query: CanonicalQuery::new("cats").with_kind(ResultKind::Image),
            elapsed_ms: 3,
            items: ResultSet::Images(ImageResults::default()),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("results").is_none());
        assert_eq!(json["images"], serde_json::json!([]));
    }

    #[test]
    fn test_response_deserializes_into_matching_variant() {
        let web = SearchResponse {
            provider: "duckduckgo".to_string(),
            query: CanonicalQuery::new("rust"),
            elapsed_ms: 1,
            items: ResultSet::Web(WebResults {
                results: vec![sample_result(1)],
                answer_box: Some(AnswerBox {
                    title: "Rust".to_string(),
                    snippet: "A language".to_string(),
                    link: None,
                }),
                knowledge_panel: None,
                related_questions: None,
            }),
        };
        let text = serde_json::to_string(&web).unwrap();
        let back: SearchResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, web);
        assert_eq!(back.items.kind(), ResultKind::Web);

        let images: SearchResponse = serde_json::from_value(serde_json::json!({
            "provider": "serper",
            "query": CanonicalQuery::new("cats").with_kind(ResultKind::Image),
            "elapsedMs": 5,
            "images": []
        }))
        .unwrap();
        assert_eq!(images.items.kind(), ResultKind::Image);
        assert!(images.web().is_none());
    }

    #[test]
    fn test_knowledge_panel_type_field() {
        let panel = KnowledgePanel {
            title: "Rust".to_string(),
            kind: Some("Programming language".to_string()),
            description: None,
            url: None,
            image_url: None,
        };
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["type"], "Programming language");
        assert!(json.get("description").is_none());
    }
}
