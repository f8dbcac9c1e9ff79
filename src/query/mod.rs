//! Canonical query model
//!
//! A `CanonicalQuery` is the provider-agnostic description of one search
//! request. It is built fresh for every user action and never mutated once
//! it has been handed to the aggregator; clamping produces a new value.

use crate::config::PageLimits;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which result vertical a query asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    #[default]
    Web,
    Image,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete, provider-agnostic search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalQuery {
    /// Trimmed query text
    pub text: String,
    /// Interface language hint (e.g. "en", "hi")
    pub language: String,
    /// Region hint (e.g. "us", "in")
    pub region: String,
    /// Requested number of items per page
    pub page_size: u32,
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Result vertical
    pub result_kind: ResultKind,
}

impl CanonicalQuery {
    /// Create a first-page web query with default locale hints
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            language: "en".to_string(),
            region: "us".to_string(),
            page_size: 10,
            page_number: 1,
            result_kind: ResultKind::Web,
        }
    }

    /// Set language hint
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set region hint
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set page size
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = page.max(1);
        self
    }

    /// Set result vertical
    pub fn with_kind(mut self, kind: ResultKind) -> Self {
        self.result_kind = kind;
        self
    }

    /// Check if query text is empty
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Return a copy whose paging fields fit inside `limits`
    pub fn clamped(&self, limits: &PageLimits) -> Self {
        let mut page_number = self.page_number.max(1);
        if let Some(max_page) = limits.max_page {
            page_number = page_number.min(max_page.max(1));
        }

        Self {
            text: self.text.trim().to_string(),
            page_size: self.page_size.clamp(1, limits.max_page_size.max(1)),
            page_number,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_page_size: u32, max_page: Option<u32>) -> PageLimits {
        PageLimits {
            default_page_size: 10,
            max_page_size,
            max_page,
        }
    }

    #[test]
    fn test_new_trims_text() {
        let query = CanonicalQuery::new("  rust programming \n");
        assert_eq!(query.text, "rust programming");
        assert_eq!(query.page_number, 1);
        assert_eq!(query.result_kind, ResultKind::Web);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(CanonicalQuery::new(" \t ").is_empty());
        assert!(!CanonicalQuery::new("x").is_empty());
    }

    #[test]
    fn test_clamp_page_size() {
        let query = CanonicalQuery::new("q").with_page_size(200);
        assert_eq!(query.clamped(&limits(20, None)).page_size, 20);

        let query = CanonicalQuery::new("q").with_page_size(0);
        assert_eq!(query.clamped(&limits(20, None)).page_size, 1);
    }

    #[test]
    fn test_clamp_page_number() {
        let mut query = CanonicalQuery::new("q");
        query.page_number = 0;
        assert_eq!(query.clamped(&limits(20, None)).page_number, 1);

        let query = CanonicalQuery::new("q").with_page(42);
        assert_eq!(query.clamped(&limits(20, None)).page_number, 42);
        assert_eq!(query.clamped(&limits(20, Some(10))).page_number, 10);
    }

    #[test]
    fn test_clamp_leaves_original_untouched() {
        let query = CanonicalQuery::new("q").with_page_size(99);
        let clamped = query.clamped(&limits(50, None));
        assert_eq!(query.page_size, 99);
        assert_eq!(clamped.page_size, 50);
    }

    #[test]
    fn test_serializes_camel_case() {
        let query = CanonicalQuery::new("q").with_kind(ResultKind::Image);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["resultKind"], "image");
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["pageNumber"], 1);
    }
}
