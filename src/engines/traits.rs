//! Provider traits and request/response plumbing

use crate::config::PageLimits;
use crate::query::{CanonicalQuery, ResultKind};
use crate::results::{ImageResults, WebResults};
use std::collections::HashMap;

/// Adapter-level failure
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{variable} is not set; the {provider} provider requires it")]
    MissingCredential {
        provider: String,
        variable: &'static str,
    },

    #[error("{provider} API {status}: {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed upstream payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not build upstream request: {0}")]
    Request(String),
}

/// HTTP request to be made for a provider
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// JSON body
    pub json: Option<serde_json::Value>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: HashMap::new(),
            json: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.json = Some(data);
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl EngineResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with the upstream status and body unless the response is 2xx
    pub fn ensure_success(&self, provider: &str) -> Result<(), ProviderError> {
        if self.is_success() {
            return Ok(());
        }
        Err(ProviderError::Http {
            provider: provider.to_string(),
            status: self.status,
            body: self.text.trim().to_string(),
        })
    }
}

/// Paging bounds a provider accepts, per vertical
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLimits {
    pub web: PageLimits,
    pub images: PageLimits,
}

impl ProviderLimits {
    pub fn for_kind(&self, kind: ResultKind) -> &PageLimits {
        match kind {
            ResultKind::Web => &self.web,
            ResultKind::Image => &self.images,
        }
    }
}

impl Default for ProviderLimits {
    fn default() -> Self {
        Self {
            web: PageLimits::web(),
            images: PageLimits::images(),
        }
    }
}

/// A search backend adapter. Every provider answers web searches; image
/// search is an optional capability exposed through [`Provider::images`].
///
/// Adapters never perform I/O themselves: they build an [`EngineRequest`]
/// and normalize the [`EngineResponse`] the caller obtained for it.
pub trait Provider: Send + Sync {
    /// Provider identifier reported as provenance
    fn name(&self) -> &str;

    /// Paging bounds enforced before any upstream call
    fn limits(&self) -> &ProviderLimits;

    /// Build the upstream request for a web search
    fn web_request(&self, query: &CanonicalQuery) -> Result<EngineRequest, ProviderError>;

    /// Normalize the upstream web search response for `query`
    fn web_response(
        &self,
        query: &CanonicalQuery,
        response: EngineResponse,
    ) -> Result<WebResults, ProviderError>;

    /// Image search capability, if this backend has one
    fn images(&self) -> Option<&dyn ImageSearch> {
        None
    }

    /// Whether this provider can answer `kind`
    fn supports(&self, kind: ResultKind) -> bool {
        match kind {
            ResultKind::Web => true,
            ResultKind::Image => self.images().is_some(),
        }
    }
}

/// Optional image search capability
pub trait ImageSearch: Send + Sync {
    /// Build the upstream request for an image search
    fn image_request(&self, query: &CanonicalQuery) -> Result<EngineRequest, ProviderError>;

    /// Normalize the upstream image search response for `query`
    fn image_response(
        &self,
        query: &CanonicalQuery,
        response: EngineResponse,
    ) -> Result<ImageResults, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = EngineRequest::post("https://api.example/search")
            .header("X-API-KEY", "k")
            .param("a", "1")
            .json(serde_json::json!({"q": "x"}));

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers.get("X-API-KEY").map(String::as_str), Some("k"));
        assert_eq!(request.params.get("a").map(String::as_str), Some("1"));
        assert!(request.json.is_some());
    }

    #[test]
    fn test_ensure_success() {
        let ok = EngineResponse {
            status: 204,
            text: String::new(),
        };
        assert!(ok.ensure_success("p").is_ok());

        let failed = EngineResponse {
            status: 429,
            text: " slow down \n".to_string(),
        };
        let err = failed.ensure_success("p").unwrap_err();
        assert_eq!(err.to_string(), "p API 429: slow down");
    }

    #[test]
    fn test_json_parse_error() {
        let response = EngineResponse {
            status: 200,
            text: "<html>".to_string(),
        };
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
