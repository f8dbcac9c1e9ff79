//! Dispatch targets for the query controller

use crate::error::{ErrorBody, SearchError};
use crate::query::{CanonicalQuery, ResultKind};
use crate::results::SearchResponse;
use crate::search::Aggregator;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Anything that can answer a canonical query
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, query: CanonicalQuery) -> Result<SearchResponse, SearchError>;
}

#[async_trait]
impl Dispatcher for Aggregator {
    async fn dispatch(&self, query: CanonicalQuery) -> Result<SearchResponse, SearchError> {
        self.handle(query).await
    }
}

#[derive(Debug, Deserialize)]
struct Health {
    provider: String,
}

/// Client for a running server's JSON API
#[derive(Clone)]
pub struct RemoteDispatcher {
    client: Client,
    base_url: String,
    provider: String,
}

impl RemoteDispatcher {
    /// Create a dispatcher for the server at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            provider: "unknown".to_string(),
        }
    }

    /// Create a dispatcher and learn the server's provider from `/api/health`
    pub async fn connect(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let mut remote = Self::new(base_url);
        let health: Health = remote
            .client
            .get(format!("{}/api/health", remote.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        remote.provider = health.provider;
        Ok(remote)
    }

    /// Provider reported by the server
    pub fn provider(&self) -> &str {
        &self.provider
    }

    fn endpoint(&self, kind: ResultKind) -> String {
        let path = match kind {
            ResultKind::Web => "api/search",
            ResultKind::Image => "api/images",
        };
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl Dispatcher for RemoteDispatcher {
    async fn dispatch(&self, query: CanonicalQuery) -> Result<SearchResponse, SearchError> {
        let kind = query.result_kind;
        let url = self.endpoint(kind);
        debug!("Dispatching '{}' to {}", query.text, url);

        let num = query.page_size.to_string();
        let page = query.page_number.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.text.as_str()),
                ("hl", query.language.as_str()),
                ("gl", query.region.as_str()),
                ("num", num.as_str()),
                ("page", page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Upstream {
                status: None,
                message: format!("network error: {}", e),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| SearchError::Upstream {
            status: None,
            message: format!("network error: {}", e),
        })?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| SearchError::Upstream {
                status: None,
                message: format!("malformed response: {}", e),
            });
        }

        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Err(SearchError::from_body(body, &self.provider, kind)),
            Err(_) => Err(SearchError::Upstream {
                status: Some(status.as_u16()),
                message: text,
            }),
        }
    }
}
